use crate::core::{
    errors::{AppError, AppResult},
    types::{DocumentNode, ScenarioRecord},
};
use crate::extract::{classify::sort_top_to_bottom, scenario::extract_scenarios};
use crate::host::DocumentHost;

/// Scenario containers of a group, top to bottom.
pub fn scenario_candidates(group: &DocumentNode) -> Vec<&DocumentNode> {
    let mut candidates = group.container_children();
    sort_top_to_bottom(&mut candidates);
    candidates
}

/// Extract the scenarios of each group and concatenate them in group order.
pub async fn extract_groups<H>(host: &H, groups: &[&DocumentNode]) -> AppResult<Vec<ScenarioRecord>>
where
    H: DocumentHost + ?Sized,
{
    if groups.is_empty() {
        return Err(AppError::InvalidInput("no group to extract".to_string()));
    }

    let mut records = Vec::new();
    for group in groups {
        let candidates = scenario_candidates(group);
        if candidates.is_empty() {
            return Err(AppError::MalformedDocument(format!(
                "{} contains no test scenarios",
                group.name
            )));
        }
        tracing::debug!(group = %group.name, scenarios = candidates.len(), "extracting group");
        records.extend(extract_scenarios(host, &candidates).await?);
    }
    Ok(records)
}
