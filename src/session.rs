// src/session.rs - Recorded landmark sessions (JSON lines) replayed as a detector
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::detector::LandmarkSource;
use crate::error::DetectorError;
use crate::frame::{FrameRecord, LandmarkFrame};

/// One line of a recording: a detected frame, or a frame the detector failed on.
#[derive(Debug, Clone)]
enum Entry {
    Frame(LandmarkFrame),
    Failure(String),
}

/// Frame-by-frame reader over a recorded session.
///
/// Each non-blank line is either a frame record
/// (`{"timestamp":..,"width":..,"height":..,"face_present":..,"hands":[..]}`)
/// or a detector failure (`{"error":"..."}`).
pub struct SessionReader {
    path: PathBuf,
    entries: Vec<Entry>,
    current_frame: usize,
}

impl SessionReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| DetectorError::Io {
            path: path.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = |message: String| DetectorError::Parse {
                path: path.clone(),
                line: i + 1,
                message,
            };

            let value: Value = serde_json::from_str(line).map_err(|e| parse_err(e.to_string()))?;
            if let Some(error) = value.get("error") {
                let message = error.as_str().unwrap_or("unknown detector failure");
                entries.push(Entry::Failure(message.to_string()));
                continue;
            }

            let record: FrameRecord =
                serde_json::from_value(value).map_err(|e| parse_err(e.to_string()))?;
            let frame = LandmarkFrame::try_from(record).map_err(|e| parse_err(e.to_string()))?;
            entries.push(Entry::Frame(frame));
        }

        info!("Loaded {} frames from {}", entries.len(), path.display());
        Ok(Self {
            path,
            entries,
            current_frame: 0,
        })
    }

    pub fn from_frames(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            entries: frames.into_iter().map(Entry::Frame).collect(),
            current_frame: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn total_frames(&self) -> usize {
        self.entries.len()
    }

    pub fn frames_read(&self) -> usize {
        self.current_frame
    }

    /// First successfully detected frame, used to check the capture size up front.
    pub fn first_frame(&self) -> Option<&LandmarkFrame> {
        self.entries.iter().find_map(|e| match e {
            Entry::Frame(f) => Some(f),
            Entry::Failure(_) => None,
        })
    }

    pub fn seek(&mut self, frame_index: usize) {
        self.current_frame = frame_index.min(self.entries.len());
    }

    pub fn rewind(&mut self) {
        self.seek(0);
    }

    pub fn progress(&self) -> f32 {
        if self.entries.is_empty() {
            return 1.0;
        }
        self.current_frame as f32 / self.entries.len() as f32
    }
}

impl LandmarkSource for SessionReader {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, DetectorError> {
        let Some(entry) = self.entries.get(self.current_frame) else {
            return Ok(None);
        };
        self.current_frame += 1;
        match entry {
            Entry::Frame(frame) => Ok(Some(frame.clone())),
            Entry::Failure(message) => Err(DetectorError::Detection(message.clone())),
        }
    }
}

/// Writes frames as a JSON-lines recording readable by [`SessionReader::open`].
pub fn write_session(path: impl AsRef<Path>, frames: &[LandmarkFrame]) -> Result<(), DetectorError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| DetectorError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).map_err(io_err)?;
    for frame in frames {
        let line = serde_json::to_string(&FrameRecord::from(frame)).map_err(|e| DetectorError::Parse {
            path: path.to_path_buf(),
            line: 0,
            message: e.to_string(),
        })?;
        writeln!(file, "{}", line).map_err(io_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::fixtures::{frame, hand, Pose};
    use crate::frame::Handedness;

    #[test]
    fn written_session_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let frames = vec![
            frame(0.0, vec![hand(Handedness::Left, Pose::Open)], true),
            frame(0.033, Vec::new(), false),
        ];
        write_session(&path, &frames).unwrap();

        let mut reader = SessionReader::open(&path).unwrap();
        assert_eq!(reader.total_frames(), 2);

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.hands.len(), 1);
        assert!(first.face_present);
        for (a, b) in first.hands[0].keypoints().iter().zip(frames[0].hands[0].keypoints()) {
            assert!((a - b).norm() < 1e-12);
        }

        let second = reader.next_frame().unwrap().unwrap();
        assert!(second.hands.is_empty());
        assert!(reader.next_frame().unwrap().is_none());
        assert_eq!(reader.progress(), 1.0);
    }

    #[test]
    fn failure_lines_surface_as_detection_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        fs::write(
            &path,
            "{\"timestamp\":0.0,\"width\":640,\"height\":480}\n\n{\"error\":\"model crashed\"}\n",
        )
        .unwrap();

        let mut reader = SessionReader::open(&path).unwrap();
        assert_eq!(reader.total_frames(), 2);
        assert!(reader.next_frame().unwrap().is_some());
        assert!(matches!(reader.next_frame(), Err(DetectorError::Detection(m)) if m == "model crashed"));
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn bad_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        fs::write(
            &path,
            "{\"timestamp\":0.0,\"width\":640,\"height\":480}\n{\"timestamp\":0.1,\"width\":640,\"height\":480,\"hands\":[{\"label\":\"Left\",\"confidence\":1.0,\"keypoints\":[[0.1,0.1]]}]}\n",
        )
        .unwrap();

        match SessionReader::open(&path) {
            Err(DetectorError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|r| r.total_frames())),
        }
    }

    #[test]
    fn seek_and_rewind() {
        let mut reader = SessionReader::from_frames(vec![
            frame(0.0, Vec::new(), true),
            frame(0.1, Vec::new(), true),
        ]);
        reader.seek(10);
        assert!(reader.next_frame().unwrap().is_none());
        reader.rewind();
        assert_eq!(reader.frames_read(), 0);
        assert_eq!(reader.next_frame().unwrap().unwrap().timestamp, 0.0);
    }
}
