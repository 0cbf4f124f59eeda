use std::fmt;

use serde::{Deserialize, Serialize};

pub const EXPECTED_RESULT_ID: &str = "Product selector";
pub const BOLD_WEIGHT: u16 = 700;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Section,
    Frame,
    Text,
    #[serde(other)]
    Other,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(self, Self::Section | Self::Frame)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// A node of the host document tree. Read-only for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub font_name: Option<FontName>,
    #[serde(default)]
    pub font_weight: Option<u16>,
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == Some(BOLD_WEIGHT)
    }

    /// Depth-first search over all descendants, excluding `self`.
    pub fn find_all<'a, P>(&'a self, predicate: P) -> Vec<&'a DocumentNode>
    where
        P: Fn(&DocumentNode) -> bool,
    {
        let mut found = Vec::new();
        let mut stack: Vec<&DocumentNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if predicate(node) {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    pub fn container_children(&self) -> Vec<&DocumentNode> {
        self.children.iter().filter(|child| child.is_container()).collect()
    }

    pub fn text_children(&self) -> Vec<&DocumentNode> {
        self.children.iter().filter(|child| child.is_text()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStep {
    pub id: String,
    pub question_text: String,
    pub selected_response: String,
}

impl QuestionStep {
    /// `id:questionText:selectedResponse`, one line of the steps cell.
    pub fn to_cell_line(&self) -> String {
        format!("{}:{}:{}", self.id, self.question_text, self.selected_response)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedResult {
    pub id: String,
    pub result: String,
}

impl ExpectedResult {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            id: EXPECTED_RESULT_ID.to_string(),
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    pub name: String,
    pub steps: Vec<QuestionStep>,
    pub expected_result: ExpectedResult,
}

/// Messages received from the presentation surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PluginMessage {
    Export,
}

/// Messages posted to the presentation surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiMessage {
    CsvData { content: String, filename: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub content: String,
    pub filename: String,
    pub row_count: usize,
}

impl From<CsvExport> for UiMessage {
    fn from(value: CsvExport) -> Self {
        Self::CsvData {
            content: value.content,
            filename: value.filename,
        }
    }
}
