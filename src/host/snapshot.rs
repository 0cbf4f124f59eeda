use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::core::{
    errors::{AppError, AppResult},
    types::{DocumentNode, FontName, UiMessage},
};
use crate::host::DocumentHost;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub selection: Vec<String>,
    /// Fonts the host can prepare. Absent means every font is available.
    #[serde(default)]
    pub fonts: Option<Vec<FontName>>,
    pub nodes: Vec<DocumentNode>,
}

impl DocumentSnapshot {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::Io(format!("cannot read snapshot {}: {err}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replace the stored selection. An empty list keeps it.
    pub fn with_selection(mut self, ids: Vec<String>) -> Self {
        if !ids.is_empty() {
            self.selection = ids;
        }
        self
    }

    fn find_by_id(&self, id: &str) -> Option<&DocumentNode> {
        self.nodes.iter().find_map(|root| {
            if root.id == id {
                Some(root)
            } else {
                root.find_all(|node| node.id == id).into_iter().next()
            }
        })
    }
}

/// What the host reports back to its surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Notify(String),
    Message(UiMessage),
}

pub struct SnapshotHost {
    snapshot: DocumentSnapshot,
    loaded_fonts: Mutex<HashSet<FontName>>,
    events: UnboundedSender<HostEvent>,
}

impl SnapshotHost {
    /// Fails with `NotFound` when a selected id is not present in the tree.
    pub fn new(snapshot: DocumentSnapshot, events: UnboundedSender<HostEvent>) -> AppResult<Self> {
        if let Some(missing) = snapshot
            .selection
            .iter()
            .find(|id| snapshot.find_by_id(id).is_none())
        {
            return Err(AppError::NotFound(format!("selected node {missing}")));
        }
        Ok(Self {
            snapshot,
            loaded_fonts: Mutex::new(HashSet::new()),
            events,
        })
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    fn font_available(&self, font: &FontName) -> bool {
        match &self.snapshot.fonts {
            Some(fonts) => fonts.contains(font),
            None => true,
        }
    }

    fn font_loaded(&self, font: &FontName) -> AppResult<bool> {
        let loaded = self
            .loaded_fonts
            .lock()
            .map_err(|err| AppError::Internal(format!("font registry poisoned: {err}")))?;
        Ok(loaded.contains(font))
    }
}

impl DocumentHost for SnapshotHost {
    fn selection(&self) -> Vec<&DocumentNode> {
        self.snapshot
            .selection
            .iter()
            .filter_map(|id| self.snapshot.find_by_id(id))
            .collect()
    }

    fn load_font<'a>(&'a self, font: &'a FontName) -> BoxFuture<'a, AppResult<()>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            if !self.font_available(font) {
                return Err(AppError::FontLoad(format!("font {font} is not installed")));
            }
            self.loaded_fonts
                .lock()
                .map_err(|err| AppError::Internal(format!("font registry poisoned: {err}")))?
                .insert(font.clone());
            tracing::trace!(%font, "font loaded");
            Ok(())
        })
    }

    fn characters<'a>(&'a self, node: &'a DocumentNode) -> AppResult<&'a str> {
        if !node.is_text() {
            return Err(AppError::InvalidInput(format!(
                "node {} is not a text node",
                node.name
            )));
        }
        if let Some(font) = &node.font_name {
            if !self.font_loaded(font)? {
                return Err(AppError::FontNotLoaded(font.clone()));
            }
        }
        Ok(node.characters.as_deref().unwrap_or(""))
    }

    fn notify(&self, message: &str) {
        let _ = self.events.send(HostEvent::Notify(message.to_string()));
    }

    fn post_message(&self, message: UiMessage) {
        let _ = self.events.send(HostEvent::Message(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json() -> &'static str {
        r#"{
          "selection": ["2"],
          "fonts": [{ "family": "Inter", "style": "Regular" }],
          "nodes": [{
            "id": "1", "type": "SECTION", "name": "Checkout",
            "children": [{
              "id": "2", "type": "TEXT", "name": "label", "characters": "Hello",
              "fontName": { "family": "Inter", "style": "Regular" }, "fontWeight": 400
            }, {
              "id": "3", "type": "TEXT", "name": "label", "characters": "World",
              "fontName": { "family": "Roboto", "style": "Bold" }, "fontWeight": 700
            }]
          }]
        }"#
    }

    #[tokio::test]
    async fn reads_text_only_after_font_is_loaded() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let host = SnapshotHost::new(DocumentSnapshot::from_json(snapshot_json()).unwrap(), tx).unwrap();
        let node = host.selection()[0];

        assert!(matches!(host.characters(node), Err(AppError::FontNotLoaded(_))));
        host.load_font(&FontName::new("Inter", "Regular")).await.unwrap();
        assert_eq!(host.characters(node).unwrap(), "Hello");
    }

    #[tokio::test]
    async fn unavailable_font_fails_to_load() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let host = SnapshotHost::new(DocumentSnapshot::from_json(snapshot_json()).unwrap(), tx).unwrap();

        let err = host
            .load_font(&FontName::new("Roboto", "Bold"))
            .await
            .expect_err("Roboto is not listed");
        assert_eq!(err.code(), "FONT_LOAD");
    }

    #[test]
    fn rejects_selection_of_unknown_node() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut snapshot = DocumentSnapshot::from_json(snapshot_json()).unwrap();
        snapshot.selection = vec!["404".to_string()];
        let err = SnapshotHost::new(snapshot, tx).err().expect("unknown id");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn selection_override_replaces_stale_ids() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut snapshot = DocumentSnapshot::from_json(snapshot_json()).unwrap();
        snapshot.selection = vec!["404".to_string()];

        let host = SnapshotHost::new(snapshot.with_selection(vec!["3".to_string()]), tx).unwrap();
        assert_eq!(host.selection()[0].id, "3");
    }

    #[test]
    fn empty_override_keeps_stored_selection() {
        let snapshot = DocumentSnapshot::from_json(snapshot_json()).unwrap();
        assert_eq!(snapshot.with_selection(Vec::new()).selection, ["2"]);
    }
}
