// file: src/render/mod.rs
// description: render capability module exports
// reference: internal module structure

pub mod error;
pub mod nuke;
pub mod script;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::RenderError;
pub use nuke::NukeScriptRenderer;
pub use traits::{Renderer, StageRef};
