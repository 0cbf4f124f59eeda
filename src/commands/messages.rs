use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    commands::export::{export_selection, ExportOutcome},
    core::{errors::AppResult, types::PluginMessage},
    host::DocumentHost,
};

/// Summary of a finished message loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub delivered: usize,
    pub rejected: usize,
    pub failed: usize,
    pub ignored: usize,
}

pub async fn handle_message<H>(host: &H, raw: &str) -> AppResult<Option<ExportOutcome>>
where
    H: DocumentHost + ?Sized,
{
    match serde_json::from_str::<PluginMessage>(raw) {
        Ok(PluginMessage::Export) => export_selection(host).await.map(Some),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unrecognized message");
            Ok(None)
        }
    }
}

/// Serve messages until the reader is exhausted.
///
/// A failed export only ends that export; the loop keeps serving.
/// Lines that are not UTF-8 are skipped; only a read failure ends the loop.
pub async fn run_message_loop<H, R>(host: &H, mut reader: R) -> AppResult<LoopStats>
where
    H: DocumentHost + ?Sized,
    R: AsyncBufRead + Unpin,
{
    let mut stats = LoopStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring line that is not UTF-8");
                stats.ignored += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match handle_message(host, line).await {
            Ok(Some(ExportOutcome::Delivered(_))) => stats.delivered += 1,
            Ok(Some(ExportOutcome::Rejected(_))) => stats.rejected += 1,
            Ok(None) => stats.ignored += 1,
            Err(err) => {
                tracing::error!(code = err.code(), error = %err, "export aborted");
                stats.failed += 1;
            }
        }
    }

    tracing::info!(?stats, "input closed, message loop finished");
    Ok(stats)
}
