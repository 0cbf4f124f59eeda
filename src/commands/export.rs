use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{CsvExport, ScenarioRecord},
    },
    export::csv,
    extract::{
        classify::{classify, looks_like_scenario},
        group::extract_groups,
        scenario::extract_scenarios,
    },
    host::DocumentHost,
};

/// Why an export produced no CSV. The message has already been shown.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered(CsvExport),
    Rejected(Rejection),
}

/// Records extracted from the current selection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionExtract {
    pub selection_name: String,
    pub group_label: Option<String>,
    pub records: Vec<ScenarioRecord>,
}

/// Resolve the selection into scenario records without reporting anything.
///
/// A selection whose name reads as a scenario goes through the one-element
/// batch path; anything else is treated as a group of scenarios.
pub async fn extract_selection<H>(host: &H) -> AppResult<SelectionExtract>
where
    H: DocumentHost + ?Sized,
{
    let selection = host.selection();
    let node = match selection.as_slice() {
        [] => return Err(AppError::NoSelection),
        [node] => *node,
        many => return Err(AppError::MultipleSelection(many.len())),
    };
    tracing::debug!(name = %node.name, role = ?classify(node), "exporting selection");

    if looks_like_scenario(&node.name) {
        let records = extract_scenarios(host, &[node]).await?;
        Ok(SelectionExtract {
            selection_name: node.name.clone(),
            group_label: None,
            records,
        })
    } else {
        let records = extract_groups(host, &[node]).await?;
        Ok(SelectionExtract {
            selection_name: node.name.clone(),
            group_label: Some(node.name.clone()),
            records,
        })
    }
}

pub async fn build_export<H>(host: &H) -> AppResult<CsvExport>
where
    H: DocumentHost + ?Sized,
{
    let extract = extract_selection(host).await?;
    Ok(CsvExport {
        content: csv::serialize(&extract.records, extract.group_label.as_deref()),
        filename: extract.selection_name,
        row_count: extract.records.len(),
    })
}

/// One export pass: deliver the CSV, or notify the user and deliver nothing.
///
/// Selection and document-shape problems end in [`ExportOutcome::Rejected`].
/// Host failures are returned as errors.
pub async fn export_selection<H>(host: &H) -> AppResult<ExportOutcome>
where
    H: DocumentHost + ?Sized,
{
    match build_export(host).await {
        Ok(export) => {
            tracing::info!(
                filename = %export.filename,
                rows = export.row_count,
                "export delivered"
            );
            host.post_message(export.clone().into());
            Ok(ExportOutcome::Delivered(export))
        }
        Err(err) => match err.user_message() {
            Some(message) => {
                tracing::warn!(code = err.code(), error = %err, "export rejected");
                host.notify(message);
                Ok(ExportOutcome::Rejected(Rejection {
                    code: err.code(),
                    message,
                }))
            }
            None => {
                tracing::error!(code = err.code(), error = %err, "export failed");
                Err(err)
            }
        },
    }
}

/// Run one export pass and write the CSV to `<out_dir>/<filename>.csv`.
///
/// Returns `None` when the export was rejected.
pub async fn export_to_dir<H>(host: &H, out_dir: &Path) -> AppResult<Option<PathBuf>>
where
    H: DocumentHost + ?Sized,
{
    let ExportOutcome::Delivered(export) = export_selection(host).await? else {
        return Ok(None);
    };

    std::fs::create_dir_all(out_dir).map_err(|err| AppError::Io(err.to_string()))?;
    let file_path = out_dir.join(format!("{}.csv", file_stem(&export.filename)));
    std::fs::write(&file_path, export.content.as_bytes())?;
    tracing::info!(path = %file_path.display(), "csv written");
    Ok(Some(file_path))
}

/// Selection names are free text; keep them usable as a file name.
fn file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.to_string()
    }
}
