// file: src/sequence/scanner.rs
// description: Directory listing and frame sequence grouping
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::models::{FrameSequence, SequenceTemplate};
use crate::sequence::patterns::parse_frame_file_name;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Groups the files of one directory into frame sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceScanner {
    extensions: Option<Vec<String>>,
    frame_spec: Option<String>,
}

impl SequenceScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only start groups for these extensions (case-sensitive).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Placeholder written in place of the frame number, e.g. `{FRAME}`.
    /// Without one, a printf spec matching the first member's padding is used.
    pub fn with_frame_spec(mut self, frame_spec: impl Into<String>) -> Self {
        self.frame_spec = Some(frame_spec.into());
        self
    }

    /// Scans `folder` (not recursively). The whole listing is read and
    /// grouped before this returns, since a group is only complete once
    /// every entry has been seen. Groups come out in order of first
    /// sighting; frames within a group are in listing order, not sorted.
    ///
    /// Names that differ only in separator or padding (`shot.0001.exr`,
    /// `shot_0001.exr`, `shot.1.exr`) share a group, and a frame number
    /// already in the group is recorded once.
    pub fn scan(&self, folder: &Path) -> Result<SequenceGroups> {
        debug!("Scanning for frame sequences in {}", folder.display());

        let metadata = fs::metadata(folder).map_err(|source| PipelineError::FileOperation {
            path: folder.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(PipelineError::FileOperation {
                path: folder.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, (FrameSequence, HashSet<i64>)> = HashMap::new();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().is_dir() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 name: {}", entry.path().display());
                continue;
            };

            let Some(parsed) = parse_frame_file_name(file_name) else {
                continue;
            };

            let Ok(frame) = parsed.digits.parse::<i64>() else {
                debug!("Skipping out of range frame number: {}", file_name);
                continue;
            };

            let key = SequenceTemplate::group_key(parsed.prefix, parsed.extension);

            if let Some((sequence, seen)) = groups.get_mut(&key) {
                // Padding and separator stay as set by the first member.
                if seen.insert(frame) {
                    sequence.push_frame(frame);
                } else {
                    debug!("Skipping duplicate frame {}: {}", frame, file_name);
                }
                continue;
            }

            if let Some(extensions) = &self.extensions
                && !extensions.iter().any(|ext| ext == parsed.extension)
            {
                continue;
            }

            let frame_spec = self
                .frame_spec
                .clone()
                .unwrap_or_else(|| SequenceTemplate::printf_spec(parsed.padding()));

            let template = SequenceTemplate {
                directory: folder.to_path_buf(),
                prefix: parsed.prefix.to_string(),
                separator: parsed.separator,
                padding: parsed.padding(),
                extension: parsed.extension.to_string(),
                frame_spec,
            };

            order.push(key.clone());
            groups.insert(
                key,
                (FrameSequence::new(template, frame), HashSet::from([frame])),
            );
        }

        let sequences: Vec<FrameSequence> = order
            .into_iter()
            .filter_map(|key| groups.remove(&key).map(|(sequence, _)| sequence))
            .collect();

        info!(
            "Found {} frame sequence(s) in {}",
            sequences.len(),
            folder.display()
        );

        Ok(SequenceGroups {
            inner: sequences.into_iter(),
        })
    }
}

/// Groups collected by one scan, handed out once each. The listing is
/// already fully read, so `len()` is exact before iteration starts.
#[derive(Debug)]
pub struct SequenceGroups {
    inner: std::vec::IntoIter<FrameSequence>,
}

impl Iterator for SequenceGroups {
    type Item = FrameSequence;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SequenceGroups {}
