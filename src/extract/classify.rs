use crate::core::types::{DocumentNode, EXPECTED_RESULT_ID};

const SCENARIO_MARKER: &str = "test scenario";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ScenarioGroup,
    Scenario,
    ExpectedResult,
    Text,
    Other,
}

/// Role of a direct child of a scenario container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    ExpectedResult,
    Step,
    Text,
    Other,
}

pub fn classify(node: &DocumentNode) -> Role {
    if node.is_text() {
        return Role::Text;
    }
    if !node.is_container() {
        return Role::Other;
    }
    if is_expected_result_name(&node.name) {
        Role::ExpectedResult
    } else if is_scenario_name(&node.name) {
        Role::Scenario
    } else if !looks_like_scenario(&node.name) {
        Role::ScenarioGroup
    } else {
        Role::Other
    }
}

pub fn classify_child(node: &DocumentNode) -> ChildRole {
    if node.is_text() {
        ChildRole::Text
    } else if !node.is_container() {
        ChildRole::Other
    } else if is_expected_result_name(&node.name) {
        ChildRole::ExpectedResult
    } else {
        ChildRole::Step
    }
}

pub fn is_scenario_container(node: &DocumentNode) -> bool {
    node.is_container() && is_scenario_name(&node.name)
}

pub fn is_scenario_name(name: &str) -> bool {
    name.to_lowercase().contains(SCENARIO_MARKER)
}

/// Names that read as a scenario rather than a group: the scenario marker,
/// or any digit (`3`, `3a`, `Case 12`).
pub fn looks_like_scenario(name: &str) -> bool {
    is_scenario_name(name) || name.chars().any(|c| c.is_ascii_digit())
}

pub fn is_expected_result_name(name: &str) -> bool {
    name == EXPECTED_RESULT_ID
}

/// Stable sort by ascending `x`. Equal positions keep tree order.
pub fn sort_left_to_right(nodes: &mut [&DocumentNode]) {
    nodes.sort_by(|a, b| a.x.total_cmp(&b.x));
}

/// Stable sort by ascending `y`. Equal positions keep tree order.
pub fn sort_top_to_bottom(nodes: &mut [&DocumentNode]) {
    nodes.sort_by(|a, b| a.y.total_cmp(&b.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::NodeKind;

    fn container(name: &str) -> DocumentNode {
        DocumentNode {
            id: String::new(),
            kind: NodeKind::Section,
            name: name.to_string(),
            x: 0.0,
            y: 0.0,
            characters: None,
            font_name: None,
            font_weight: None,
            children: vec![],
        }
    }

    #[test]
    fn scenario_marker_ignores_case() {
        assert_eq!(classify(&container("Test Scenario 1")), Role::Scenario);
        assert_eq!(classify(&container("test scenario: happy path")), Role::Scenario);
    }

    #[test]
    fn names_without_marker_or_digits_are_groups() {
        assert_eq!(classify(&container("Checkout")), Role::ScenarioGroup);
        assert_eq!(classify(&container("12")), Role::Other);
        assert_eq!(classify(&container("Product selector")), Role::ExpectedResult);
    }

    #[test]
    fn ties_keep_tree_order() {
        let mut a = container("a");
        a.x = 5.0;
        let mut b = container("b");
        b.x = 5.0;
        let mut c = container("c");
        c.x = 1.0;
        let mut nodes = vec![&a, &b, &c];
        sort_left_to_right(&mut nodes);
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }
}
