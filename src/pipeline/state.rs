// file: src/pipeline/state.rs
// description: linear review pipeline state machine
// reference: stage sequencing for the review orchestrator

use serde::Serialize;
use std::fmt;

/// Stages of a single review run. Transitions are strictly linear; any
/// stage may instead move to `Failed` when its failure policy is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineState {
    Validating,
    Configuring,
    BuildingSlate,
    BuildingOutput,
    Rendering,
    Uploading,
    Done,
    Failed,
}

impl PipelineState {
    /// Working stages in execution order.
    pub const STAGES: [PipelineState; 6] = [
        PipelineState::Validating,
        PipelineState::Configuring,
        PipelineState::BuildingSlate,
        PipelineState::BuildingOutput,
        PipelineState::Rendering,
        PipelineState::Uploading,
    ];

    pub fn next(self) -> Option<PipelineState> {
        match self {
            Self::Validating => Some(Self::Configuring),
            Self::Configuring => Some(Self::BuildingSlate),
            Self::BuildingSlate => Some(Self::BuildingOutput),
            Self::BuildingOutput => Some(Self::Rendering),
            Self::Rendering => Some(Self::Uploading),
            Self::Uploading => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn can_transition_to(self, target: PipelineState) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == Self::Failed || self.next() == Some(target)
    }

    /// 1-based position among the working stages, for step banners.
    pub fn step_number(self) -> Option<usize> {
        Self::STAGES.iter().position(|s| *s == self).map(|i| i + 1)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validating => "validating sequence",
            Self::Configuring => "configuring scene",
            Self::BuildingSlate => "building slate",
            Self::BuildingOutput => "building output",
            Self::Rendering => "rendering",
            Self::Uploading => "uploading",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}
