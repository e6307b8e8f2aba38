// src/export.rs - Per-frame action log export and session report
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;

use crate::app::FrameReport;
use crate::device::{DeviceAction, MouseButton};

#[derive(Debug, Serialize)]
struct ActionRecord {
    frame: usize,
    timestamp: f64,
    pointer_present: bool,
    actor_present: bool,
    face_present: bool,
    gate_active: bool,
    hold_progress: f64,
    drag_engaged: bool,
    detector_failed: bool,
    actions: String,
    failed_actions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: usize,
    pub moves: usize,
    pub presses: usize,
    pub releases: usize,
    pub left_clicks: usize,
    pub right_clicks: usize,
    pub sink_failures: usize,
    pub detector_failures: usize,
}

impl SessionSummary {
    fn count(&mut self, action: &DeviceAction) {
        match action {
            DeviceAction::MoveTo { .. } => self.moves += 1,
            DeviceAction::MouseDown => self.presses += 1,
            DeviceAction::MouseUp => self.releases += 1,
            DeviceAction::Click(MouseButton::Left) => self.left_clicks += 1,
            DeviceAction::Click(MouseButton::Right) => self.right_clicks += 1,
        }
    }
}

pub struct ActionLog {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<ActionRecord>,
    summary: SessionSummary,
}

fn join_actions<'a>(actions: impl Iterator<Item = &'a DeviceAction>) -> String {
    actions.map(|a| a.to_string()).collect::<Vec<_>>().join(" ")
}

impl ActionLog {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    /// `Documents/GestureCursor`, or `./output` when there is no documents folder.
    pub fn default_output_dir() -> PathBuf {
        directories::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|p| p.join("GestureCursor")))
            .unwrap_or_else(|| PathBuf::from("./output"))
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn add_frame(&mut self, report: &FrameReport) {
        let outcome = &report.outcome;

        self.summary.frames += 1;
        for action in &outcome.actions {
            self.summary.count(action);
        }
        self.summary.sink_failures += report.dispatch.failures.len();
        if report.detector_failed {
            self.summary.detector_failures += 1;
        }

        self.records.push(ActionRecord {
            frame: self.records.len(),
            timestamp: outcome.timestamp,
            pointer_present: outcome.pointer_present,
            actor_present: outcome.actor_present,
            face_present: outcome.gaze,
            gate_active: outcome.gate_active,
            hold_progress: outcome.hold_progress,
            drag_engaged: outcome.drag_engaged,
            detector_failed: report.detector_failed,
            actions: join_actions(outcome.actions.iter()),
            failed_actions: join_actions(report.dispatch.failures.iter().map(|(a, _)| a)),
        });
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("actions.csv");
        if let Some(parent) = csv_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }

        let file = File::create(&csv_path)
            .with_context(|| format!("Cannot create {}", csv_path.display()))?;
        let mut writer = Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(csv_path)
    }

    pub fn generate_report(&self) -> Result<PathBuf> {
        let report_path = self.session_dir().join("report.html");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }

        fs::write(&report_path, self.create_html_report())?;
        Ok(report_path)
    }

    fn create_html_report(&self) -> String {
        let s = &self.summary;
        let tracked = if s.frames == 0 {
            0.0
        } else {
            (1.0 - s.detector_failures as f64 / s.frames as f64) * 100.0
        };

        let rows = [
            ("Total Frames", s.frames.to_string()),
            ("Detection Success Rate", format!("{:.1}%", tracked)),
            ("Cursor Moves", s.moves.to_string()),
            ("Drags Started", s.presses.to_string()),
            ("Drags Released", s.releases.to_string()),
            ("Left Clicks", s.left_clicks.to_string()),
            ("Right Clicks", s.right_clicks.to_string()),
            ("Dropped Device Actions", s.sink_failures.to_string()),
        ];
        let items: String = rows
            .iter()
            .map(|(label, value)| {
                format!(
                    "        <div class=\"stat-item\">\n            <span class=\"stat-label\">{}:</span>\n            <span class=\"stat-value\">{}</span>\n        </div>\n",
                    label, value
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Gesture Cursor Report - {name}</title>
    <style>
        body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 40px; background: #f5f5f5; }}
        h1 {{ color: #333; }}
        .stats {{ background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-item {{ margin: 10px 0; }}
        .stat-label {{ font-weight: bold; color: #666; }}
        .stat-value {{ color: #4682EA; font-size: 1.2em; }}
    </style>
</head>
<body>
    <h1>Gesture Cursor Session Report</h1>
    <div class="stats">
        <h2>Session: {name}</h2>
{items}    </div>
</body>
</html>
"#,
            name = self.session_name,
            items = items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::FrameOutcome;
    use crate::device::DispatchReport;
    use crate::error::DeviceError;

    fn report(actions: Vec<DeviceAction>, failed: Vec<DeviceAction>) -> FrameReport {
        FrameReport {
            outcome: FrameOutcome {
                actions,
                gaze: true,
                ..Default::default()
            },
            dispatch: DispatchReport {
                executed: 0,
                failures: failed.into_iter().map(|a| (a, DeviceError::FailSafe)).collect(),
            },
            detector_failed: false,
        }
    }

    #[test]
    fn summary_counts_actions() {
        let mut log = ActionLog::new("unused", Some("test".into()));
        log.add_frame(&report(
            vec![DeviceAction::MoveTo { x: 1.0, y: 2.0 }, DeviceAction::MouseDown],
            Vec::new(),
        ));
        log.add_frame(&report(
            vec![DeviceAction::MouseUp, DeviceAction::Click(MouseButton::Right)],
            vec![DeviceAction::MouseUp],
        ));

        let s = log.summary();
        assert_eq!(s.frames, 2);
        assert_eq!(s.moves, 1);
        assert_eq!(s.presses, 1);
        assert_eq!(s.releases, 1);
        assert_eq!(s.right_clicks, 1);
        assert_eq!(s.sink_failures, 1);
    }

    #[test]
    fn csv_and_report_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ActionLog::new(dir.path(), Some("run".into()));
        log.add_frame(&report(vec![DeviceAction::MouseDown], Vec::new()));

        let csv_path = log.export_csv().unwrap();
        let csv = fs::read_to_string(&csv_path).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("frame,timestamp,pointer_present"));
        assert!(lines.next().unwrap().contains(",down,"));

        let html = fs::read_to_string(log.generate_report().unwrap()).unwrap();
        assert!(html.contains("Session: run"));
        assert!(html.contains("Drags Started:</span>"));
        assert_eq!(csv_path.parent().unwrap(), dir.path().join("run"));
    }
}
