// src/main.rs - Replays a recorded landmark session through the hand-control mode
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gesture_cursor::device::LoggingSink;
use gesture_cursor::export::ActionLog;
use gesture_cursor::session::SessionReader;
use gesture_cursor::{AppMode, ControlConfig, ControlMode, GestureApp, Tick};

#[derive(Debug, Parser)]
#[command(name = "gesture_cursor", about = "Drive the cursor from recorded hand landmarks")]
struct Args {
    /// Recorded session (JSON lines, one landmark frame per line)
    session: PathBuf,

    /// Config file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmark model the session was recorded with; control stays disabled if it is missing
    #[arg(long)]
    model: Option<PathBuf>,

    /// Where the action log and report are written
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip writing the action log and report
    #[arg(long)]
    no_export: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(ControlConfig::default_path);
    let config = ControlConfig::load(&config_path)?;

    let session = SessionReader::open(&args.session)
        .with_context(|| format!("Failed to open session {}", args.session.display()))?;
    if let Some(first) = session.first_frame() {
        config.validate_frame(first.size)?;
    }

    let mut app = GestureApp::new(ControlMode::initialize(config, args.model.as_deref(), session));
    let mut sink = LoggingSink;
    app.switch_to(AppMode::Control, &mut sink)?;

    let mut log = ActionLog::new(
        args.output.unwrap_or_else(ActionLog::default_output_dir),
        None,
    );

    loop {
        match app.tick(&mut sink) {
            Tick::Frame(report) => {
                if report.outcome.gate_active {
                    debug!("Right-click hold {:.0}%", report.outcome.hold_progress * 100.0);
                }
                log.add_frame(&report);
            }
            Tick::EndOfStream | Tick::Idle => break,
        }
    }
    app.shutdown(&mut sink)?;

    let s = log.summary();
    info!(
        "Replayed {} frames: {} moves, {} drags, {} left / {} right clicks, {} dropped",
        s.frames, s.moves, s.presses, s.left_clicks, s.right_clicks, s.sink_failures
    );

    if !args.no_export {
        let csv_path = log.export_csv()?;
        let report_path = log.generate_report()?;
        info!("Action log: {}", csv_path.display());
        info!("Report: {}", report_path.display());
    }

    Ok(())
}
