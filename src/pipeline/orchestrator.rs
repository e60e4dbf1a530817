// file: src/pipeline/orchestrator.rs
// description: drives one review run from sequence validation to tracking upload
// reference: linear staged workflow over renderer and tracking capabilities

use crate::config::{RenderFailurePolicy, ReviewConfig};
use crate::error::{PipelineError, Result};
use crate::models::frame_sequence::parent_dir;
use crate::models::{FrameRange, PublishRecord, RenderJob, SlateFields};
use crate::pipeline::state::PipelineState;
use crate::pipeline::version::{TASK, VERSION, task_status_fields, version_fields};
use crate::render::Renderer;
use crate::sequence::SequenceValidator;
use crate::tracking::{PublishLookup, TrackingClient, record_id};
use crate::utils::logging::format_step;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Result of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub version_id: u64,
    pub render_succeeded: bool,
    pub scanned_range: FrameRange,
    pub states: Vec<PipelineState>,
}

pub struct PipelineOrchestrator<'a, R, T>
where
    R: Renderer + ?Sized,
    T: TrackingClient + ?Sized,
{
    renderer: &'a mut R,
    tracking: &'a T,
    validator: SequenceValidator,
    config: ReviewConfig,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a, R, T> PipelineOrchestrator<'a, R, T>
where
    R: Renderer + ?Sized,
    T: TrackingClient + ?Sized,
{
    pub fn new(renderer: &'a mut R, tracking: &'a T, config: ReviewConfig) -> Self {
        Self {
            renderer,
            tracking,
            validator: SequenceValidator::default(),
            config,
            state: PipelineState::Validating,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States entered by the most recent run, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Fetches the publish record, then runs the review for it. A failed
    /// lookup ends the run in `Failed` before any stage work.
    pub fn run_for_publish(&mut self, job: &RenderJob, publish_id: u64) -> Result<ReviewOutcome> {
        self.begin();
        let publish = match PublishLookup::new(self.tracking).fetch(publish_id) {
            Ok(publish) => publish,
            Err(e) => return Err(self.fail(e)),
        };
        self.finish(job, &publish)
    }

    pub fn run(&mut self, job: &RenderJob, publish: &PublishRecord) -> Result<ReviewOutcome> {
        self.begin();
        self.finish(job, publish)
    }

    fn begin(&mut self) {
        self.state = PipelineState::Validating;
        self.history = vec![PipelineState::Validating];
        self.announce(PipelineState::Validating);
    }

    fn finish(&mut self, job: &RenderJob, publish: &PublishRecord) -> Result<ReviewOutcome> {
        match self.run_stages(job, publish) {
            Ok((version_id, render_succeeded, scanned_range)) => {
                self.advance(PipelineState::Done);
                info!(
                    "Review for publish {} finished as Version {}",
                    publish.id, version_id
                );
                Ok(ReviewOutcome {
                    version_id,
                    render_succeeded,
                    scanned_range,
                    states: self.history.clone(),
                })
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, e: PipelineError) -> PipelineError {
        let failed_in = self.state;
        self.advance(PipelineState::Failed);
        error!("Review failed while {}: {}", failed_in, e);
        if let PipelineError::TrackingWrite {
            version_id: Some(id),
            ..
        } = &e
        {
            warn!("Version {} was created but is incomplete", id);
        }
        e
    }

    fn run_stages(
        &mut self,
        job: &RenderJob,
        publish: &PublishRecord,
    ) -> Result<(u64, bool, FrameRange)> {
        let scanned = self.validator.validate(&job.sequence_path)?.range;

        self.advance(PipelineState::Configuring);
        info!("Building scene with the {} renderer", self.renderer.name());
        self.renderer
            .configure_scene(job.fps, job.frame_range, &self.config.color_management)
            .map_err(|e| PipelineError::scene_build(PipelineState::Configuring, e))?;
        let input = self
            .renderer
            .create_input_stage(&job.sequence_path, scanned, &job.colorspace_idt)
            .map_err(|e| PipelineError::scene_build(PipelineState::Configuring, e))?;

        self.advance(PipelineState::BuildingSlate);
        let fields =
            SlateFields::from_publish(publish, job, &Local::now(), &self.config.date_format)?;
        let slate = self
            .renderer
            .create_slate_stage(input, &fields)
            .map_err(|e| PipelineError::scene_build(PipelineState::BuildingSlate, e))?;

        self.advance(PipelineState::BuildingOutput);
        let output = self
            .renderer
            .create_output_stage(slate, &job.slate_path, &job.colorspace_odt)
            .map_err(|e| PipelineError::scene_build(PipelineState::BuildingOutput, e))?;
        ensure_output_dir(&job.slate_path)?;

        self.advance(PipelineState::Rendering);
        let (start, end) = job.frame_range.with_slate_frame();
        let render_succeeded = match self.renderer.execute(output, start, end) {
            Ok(()) => {
                info!("Rendered {} ({}-{})", job.slate_path.display(), start, end);
                true
            }
            Err(e) => match self.config.on_render_failure {
                RenderFailurePolicy::Continue => {
                    error!("Render failed, uploading anyway: {}", e);
                    false
                }
                RenderFailurePolicy::Abort => return Err(e.into()),
            },
        };

        self.advance(PipelineState::Uploading);
        let version_id = self.publish_version(job, publish)?;

        Ok((version_id, render_succeeded, scanned))
    }

    /// Creates the Version, attaches the movie and flags the task. The three
    /// writes are not rolled back if a later one fails.
    fn publish_version(&self, job: &RenderJob, publish: &PublishRecord) -> Result<u64> {
        let fields = version_fields(publish, job, &self.config.status)?;
        let task_id = publish.task()?.id;

        let created = self
            .tracking
            .create(VERSION, fields)
            .map_err(|e| PipelineError::tracking_write("create", None, e))?;
        let version_id =
            record_id(&created).map_err(|e| PipelineError::tracking_write("create", None, e))?;
        info!("Created Version {}", version_id);

        if !job.slate_path.exists() {
            warn!("Review movie {} does not exist", job.slate_path.display());
        }

        self.tracking
            .upload(
                VERSION,
                version_id,
                &job.slate_path,
                &self.config.upload_field,
            )
            .map_err(|e| PipelineError::tracking_write("upload", Some(version_id), e))?;

        self.tracking
            .update(TASK, task_id, task_status_fields(&self.config.status))
            .map_err(|e| PipelineError::tracking_write("update", Some(version_id), e))?;
        info!("Task {} set to {}", task_id, self.config.status);

        Ok(version_id)
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
        self.history.push(next);
        self.announce(next);
    }

    fn announce(&self, state: PipelineState) {
        if let Some(step) = state.step_number() {
            info!(
                "{}",
                format_step(step, PipelineState::STAGES.len(), &state.to_string())
            );
        }
    }
}

fn ensure_output_dir(movie: &Path) -> Result<()> {
    let directory = parent_dir(movie);
    if directory.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(&directory).map_err(|source| PipelineError::FileOperation {
        path: directory.clone(),
        source,
    })?;
    info!("Created output directory {}", directory.display());
    Ok(())
}
