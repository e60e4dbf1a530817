// file: src/sequence/validator.rs
// description: matches a requested sequence path against scanned candidates
// reference: sequence existence check before any render work

use crate::error::{PipelineError, Result};
use crate::models::frame_sequence::parent_dir;
use crate::models::{FrameRange, FrameSequence};
use crate::sequence::magic::normalize_magic_frame;
use crate::sequence::scanner::SequenceScanner;
use std::path::Path;
use tracing::{debug, info, warn};

/// A requested sequence that exists on disk, with its scanned frame range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSequence {
    pub sequence: FrameSequence,
    pub range: FrameRange,
}

#[derive(Debug, Clone, Default)]
pub struct SequenceValidator {
    scanner: SequenceScanner,
}

impl SequenceValidator {
    pub fn new(scanner: SequenceScanner) -> Self {
        Self { scanner }
    }

    /// Finds the group whose templated file name equals the requested file
    /// name. There is no partial or fuzzy fallback.
    pub fn validate(&self, sequence_path: &Path) -> Result<ValidatedSequence> {
        let not_found = || PipelineError::SequenceNotFound {
            requested: sequence_path.to_path_buf(),
        };

        let requested = sequence_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(not_found)?;
        let directory = parent_dir(sequence_path);

        let groups = self.scanner.scan(&directory).map_err(|e| {
            warn!("Cannot scan {}: {}", directory.display(), e);
            not_found()
        })?;

        for sequence in groups {
            let candidate = sequence.template().file_name();
            let candidate = normalize_magic_frame(&candidate);
            debug!("Comparing candidate {} to {}", candidate, requested);

            if candidate == requested {
                let range = sequence.range().ok_or_else(not_found)?;
                info!(
                    "Found sequence {} with {} frame(s), range {}",
                    sequence.template_path().display(),
                    sequence.len(),
                    range
                );
                return Ok(ValidatedSequence { sequence, range });
            }
        }

        Err(not_found())
    }
}
