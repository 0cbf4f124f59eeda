use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use scenario_export_lib::{
    commands::{
        export::{export_to_dir, extract_selection},
        messages::run_message_loop,
    },
    config::{parse_log_level, AppConfig},
    core::errors::AppResult,
    host::{DocumentSnapshot, HostEvent, SnapshotHost},
    init_tracing,
};

#[derive(Parser, Debug)]
#[command(name = "scenario-export")]
#[command(version, about = "Export test scenarios from a document snapshot to CSV")]
struct Args {
    /// Log level (trace, debug, info, warn, error); overrides SCENARIO_EXPORT_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve export requests read from stdin
    Serve {
        /// Document snapshot (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,
    },
    /// Export the selection to <out-dir>/<selection name>.csv
    Export {
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Output directory; overrides SCENARIO_EXPORT_OUT_DIR
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Node ids to select instead of the snapshot's own selection
        #[arg(long = "select")]
        select: Vec<String>,
    },
    /// Print the records extracted from the selection as JSON
    Inspect {
        #[arg(short, long)]
        snapshot: PathBuf,
        #[arg(long = "select")]
        select: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error [{}]: {err}", err.code());
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let args = Args::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(level) = args.log_level.as_deref() {
        config.log_level = parse_log_level(level);
    }
    init_tracing(config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let (tx, rx) = mpsc::unbounded_channel();
    let post_messages = matches!(args.command, Command::Serve { .. });
    let forwarder = tokio::spawn(forward_events(rx, post_messages));

    match args.command {
        Command::Serve { snapshot } => {
            let host = load_host(&snapshot, Vec::new(), tx)?;
            let stdin = BufReader::new(tokio::io::stdin());
            run_message_loop(&host, stdin).await?;
        }
        Command::Export {
            snapshot,
            out_dir,
            select,
        } => {
            let host = load_host(&snapshot, select, tx)?;
            let out_dir = out_dir.unwrap_or(config.out_dir);
            if let Some(path) = export_to_dir(&host, &out_dir).await? {
                println!("{}", path.display());
            }
        }
        Command::Inspect { snapshot, select } => {
            let host = load_host(&snapshot, select, tx)?;
            let extract = extract_selection(&host).await?;
            println!("{}", serde_json::to_string_pretty(&extract)?);
        }
    }

    // The host owned the only sender, so the forwarder drains and stops.
    let _ = forwarder.await;
    Ok(())
}

fn load_host(
    path: &Path,
    select: Vec<String>,
    tx: mpsc::UnboundedSender<HostEvent>,
) -> AppResult<SnapshotHost> {
    let snapshot = DocumentSnapshot::from_path(path)?.with_selection(select);
    SnapshotHost::new(snapshot, tx)
}

/// Notifications go to stderr. `csvData` messages go to stdout only when
/// serving; the one-shot commands report their own result.
async fn forward_events(mut rx: mpsc::UnboundedReceiver<HostEvent>, post_messages: bool) {
    let mut stdout = tokio::io::stdout();
    while let Some(event) = rx.recv().await {
        match event {
            HostEvent::Notify(message) => eprintln!("notice: {message}"),
            HostEvent::Message(_) if !post_messages => {}
            HostEvent::Message(message) => {
                let Ok(mut line) = serde_json::to_string(&message) else {
                    continue;
                };
                line.push('\n');
                if let Err(err) = stdout.write_all(line.as_bytes()).await {
                    tracing::error!(error = %err, "failed to write message");
                    break;
                }
                let _ = stdout.flush().await;
            }
        }
    }
}
