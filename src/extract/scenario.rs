use std::collections::BTreeSet;

use futures::future::try_join_all;

use crate::core::{
    errors::{AppError, AppResult},
    types::{DocumentNode, ExpectedResult, FontName, QuestionStep, ScenarioRecord},
};
use crate::extract::classify::{
    classify_child, is_expected_result_name, is_scenario_container, sort_left_to_right,
    sort_top_to_bottom, ChildRole,
};
use crate::host::DocumentHost;

/// Used when a step has no bold response candidate.
pub const FALLBACK_RESPONSE: &str = "any text";

const RESPONSE_PLACEHOLDER: &str = "response";

/// Every distinct font used by text anywhere under `node`.
pub fn collect_fonts(node: &DocumentNode) -> BTreeSet<FontName> {
    node.find_all(DocumentNode::is_text)
        .into_iter()
        .filter_map(|text| text.font_name.clone())
        .collect()
}

/// Prepare all fonts concurrently and wait for every one of them.
pub async fn prepare_fonts<H>(host: &H, fonts: &BTreeSet<FontName>) -> AppResult<()>
where
    H: DocumentHost + ?Sized,
{
    tracing::debug!(count = fonts.len(), "preparing fonts");
    try_join_all(fonts.iter().map(|font| host.load_font(font))).await?;
    Ok(())
}

pub async fn extract_scenario<H>(host: &H, scenario: &DocumentNode) -> AppResult<ScenarioRecord>
where
    H: DocumentHost + ?Sized,
{
    if !is_scenario_container(scenario) {
        return Err(AppError::NotAScenario(scenario.name.clone()));
    }

    prepare_fonts(host, &collect_fonts(scenario)).await?;

    let mut sections = scenario.container_children();
    sort_left_to_right(&mut sections);
    let (results, step_sections): (Vec<&DocumentNode>, Vec<&DocumentNode>) = sections
        .into_iter()
        .partition(|section| classify_child(section) == ChildRole::ExpectedResult);

    let result_section = match results.as_slice() {
        [section] => *section,
        [] => {
            let nested = scenario
                .find_all(|node| node.is_container() && is_expected_result_name(&node.name))
                .len();
            return Err(AppError::MalformedDocument(if nested > 0 {
                format!("{}: expected result is nested too deep", scenario.name)
            } else {
                format!("{} has no expected result", scenario.name)
            }));
        }
        many => {
            return Err(AppError::MalformedDocument(format!(
                "{} has {} expected results",
                scenario.name,
                many.len()
            )));
        }
    };

    let steps = step_sections
        .into_iter()
        .map(|section| read_step(host, section))
        .collect::<AppResult<Vec<_>>>()?;
    let expected_result = read_expected_result(host, result_section)?;

    tracing::debug!(scenario = %scenario.name, steps = steps.len(), "scenario extracted");
    Ok(ScenarioRecord {
        name: scenario.name.clone(),
        steps,
        expected_result,
    })
}

/// Extract every candidate in order. Any failure fails the whole batch.
pub async fn extract_scenarios<H>(
    host: &H,
    scenarios: &[&DocumentNode],
) -> AppResult<Vec<ScenarioRecord>>
where
    H: DocumentHost + ?Sized,
{
    let mut records = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        records.push(extract_scenario(host, scenario).await?);
    }
    Ok(records)
}

fn read_expected_result<H>(host: &H, section: &DocumentNode) -> AppResult<ExpectedResult>
where
    H: DocumentHost + ?Sized,
{
    let mut result = String::new();
    for text in section.text_children() {
        result.push_str(host.characters(text)?);
    }
    Ok(ExpectedResult::new(result))
}

fn read_step<H>(host: &H, section: &DocumentNode) -> AppResult<QuestionStep>
where
    H: DocumentHost + ?Sized,
{
    let mut lines = Vec::new();
    for text in section.text_children() {
        let content = host.characters(text)?;
        if !content.to_lowercase().contains(RESPONSE_PLACEHOLDER) {
            lines.push(text);
        }
    }
    sort_top_to_bottom(&mut lines);

    let Some((question, candidates)) = lines.split_first() else {
        return Err(AppError::MalformedDocument(format!(
            "step {} has no question text",
            section.name
        )));
    };

    let selected_response = match candidates.iter().find(|candidate| candidate.is_bold()) {
        Some(candidate) => host.characters(candidate)?.to_string(),
        None => FALLBACK_RESPONSE.to_string(),
    };

    Ok(QuestionStep {
        id: section.name.clone(),
        question_text: host.characters(question)?.to_string(),
        selected_response,
    })
}
