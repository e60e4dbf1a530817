// file: src/models/frame_sequence.rs
// description: frame sequence template, frame list and frame range models
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Naming template shared by every member of a frame sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceTemplate {
    pub directory: PathBuf,
    pub prefix: String,
    pub separator: char,
    pub padding: usize,
    pub extension: String,
    pub frame_spec: String,
}

impl SequenceTemplate {
    pub fn printf_spec(padding: usize) -> String {
        format!("%0{}d", padding)
    }

    pub fn file_name(&self) -> String {
        let mut name = format!("{}{}{}", self.prefix, self.separator, self.frame_spec);
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }

    /// Grouping key: prefix and extension, ignoring separator and digits.
    pub fn group_key(prefix: &str, extension: &str) -> String {
        format!("{}.{}", prefix, extension)
    }
}

/// One detected sequence. Frames stay in the order files were seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSequence {
    template: SequenceTemplate,
    frames: Vec<i64>,
}

impl FrameSequence {
    pub fn new(template: SequenceTemplate, first_frame: i64) -> Self {
        Self {
            template,
            frames: vec![first_frame],
        }
    }

    pub fn push_frame(&mut self, frame: i64) {
        self.frames.push(frame);
    }

    pub fn template(&self) -> &SequenceTemplate {
        &self.template
    }

    pub fn template_path(&self) -> PathBuf {
        self.template.path()
    }

    pub fn frames(&self) -> &[i64] {
        &self.frames
    }

    pub fn sorted_frames(&self) -> Vec<i64> {
        let mut frames = self.frames.clone();
        frames.sort_unstable();
        frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn range(&self) -> Option<FrameRange> {
        FrameRange::from_frames(&self.frames)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub first: i64,
    pub last: i64,
}

impl FrameRange {
    pub fn new(first: i64, last: i64) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    /// Numeric min/max of an unordered frame list.
    pub fn from_frames(frames: &[i64]) -> Option<Self> {
        let first = *frames.iter().min()?;
        let last = *frames.iter().max()?;
        Some(Self { first, last })
    }

    pub fn duration(&self) -> i64 {
        self.last - self.first
    }

    /// Slate label, e.g. `1001 - 1010 (9)`.
    pub fn slate_label(&self) -> String {
        format!("{} - {} ({})", self.first, self.last, self.duration())
    }

    /// Compact label stored on the tracking record, e.g. `1001-1010`.
    pub fn tracking_label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }

    /// Render bounds with one leading frame reserved for the slate.
    pub fn with_slate_frame(&self) -> (i64, i64) {
        (self.first - 1, self.last)
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
