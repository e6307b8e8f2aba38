// src/bin/inspect_session.rs - Prints per-frame roles and gesture predicates of a recording
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gesture_cursor::detector::LandmarkSource;
use gesture_cursor::gesture::{self, HandGestures};
use gesture_cursor::roles::RoleAssignor;
use gesture_cursor::session::SessionReader;
use gesture_cursor::ControlConfig;

#[derive(Debug, Parser)]
#[command(name = "inspect_session")]
struct Args {
    session: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = ControlConfig::load(args.config.unwrap_or_else(ControlConfig::default_path))?;
    config.validate()?;

    let assignor = RoleAssignor::new(config.mirrored_input, config.pointer_hand, config.min_hand_confidence);
    let thresholds = config.thresholds();
    let mut reader = SessionReader::open(&args.session)?;

    println!("Inspecting {} ({} frames)", reader.path().display(), reader.total_frames());
    let mut index = 0;
    loop {
        let frame = match reader.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                println!("[{:>5}] detector failure: {}", index, e);
                index += 1;
                continue;
            }
        };

        let roles = assignor.assign(&frame.hands);
        let describe = |hand: Option<&gesture_cursor::HandObservation>| match hand {
            Some(h) => {
                let g = HandGestures::classify(h, frame.size, &thresholds);
                format!(
                    "{:?} conf={:.2} pinch_i={} pinch_m={} fist={} folds={}",
                    h.handedness,
                    h.confidence,
                    g.pinch_index,
                    g.pinch_middle,
                    g.fist,
                    gesture::folded_fingers(h, frame.size)
                )
            }
            None => "-".to_string(),
        };

        println!(
            "[{:>5}] t={:.3} gaze={} pointer: {} | actor: {}",
            index,
            frame.timestamp,
            gesture::gaze_present(&frame),
            describe(roles.pointer),
            describe(roles.actor)
        );
        index += 1;
    }

    Ok(())
}
