// file: src/utils/validation.rs
// description: launch argument checks run before any network or render work
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_site_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Usage(format!(
                "Site URL must start with http:// or https://: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_not_empty(name: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(PipelineError::Usage(format!("{} must not be empty", name)));
        }
        Ok(())
    }

    /// The sequence path names a file template, not a directory.
    pub fn validate_sequence_path(path: &Path) -> Result<()> {
        if path.file_name().is_none() || path.is_dir() {
            return Err(PipelineError::Usage(format!(
                "Sequence path must name a frame template: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_movie_path(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => Ok(()),
            _ => Err(PipelineError::Usage(format!(
                "Slate path needs a file extension: {}",
                path.display()
            ))),
        }
    }
}
