// file: src/sequence/mod.rs
// description: frame sequence discovery module exports
// reference: internal module structure

pub mod magic;
pub mod patterns;
pub mod scanner;
pub mod validator;

pub use magic::normalize_magic_frame;
pub use scanner::{SequenceGroups, SequenceScanner};
pub use validator::{SequenceValidator, ValidatedSequence};
