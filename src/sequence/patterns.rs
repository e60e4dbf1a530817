// file: src/sequence/patterns.rs
// description: compiled regex patterns for frame number detection
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // <prefix><separator><digits>.<extension>
    pub static ref FRAME_FILE: Regex = Regex::new(
        r"(?i)^(.*)([._-])(\d+)\.([^.]+)$"
    ).expect("FRAME_FILE regex is valid");
}

/// Pieces of a file name that carries a trailing frame number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFileName<'a> {
    pub prefix: &'a str,
    pub separator: char,
    pub digits: &'a str,
    pub extension: &'a str,
}

impl FrameFileName<'_> {
    pub fn padding(&self) -> usize {
        self.digits.len()
    }
}

pub fn parse_frame_file_name(file_name: &str) -> Option<FrameFileName<'_>> {
    let caps = FRAME_FILE.captures(file_name)?;
    let separator = caps.get(2)?.as_str().chars().next()?;

    Some(FrameFileName {
        prefix: caps.get(1)?.as_str(),
        separator,
        digits: caps.get(3)?.as_str(),
        extension: caps.get(4)?.as_str(),
    })
}
