// file: src/render/nuke.rs
// description: Nuke-backed renderer that writes a .nk script and runs it in terminal mode
// reference: https://learn.foundry.com/nuke/content/comp_environment/configuring_nuke/command_line_operations.html

use crate::config::RendererConfig;
use crate::models::{FrameRange, SlateFields};
use crate::render::error::RenderError;
use crate::render::script::{Knob, NukeNode, NukeScript};
use crate::render::traits::{Renderer, StageRef};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

const WRITE_CLASS: &str = "Write";

/// Builds the scene as a Nuke script and executes it with the configured
/// Nuke binary (`-X <write> -F <start>-<end>`).
pub struct NukeScriptRenderer {
    config: RendererConfig,
    script: NukeScript,
}

impl NukeScriptRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            script: NukeScript::new(),
        }
    }

    pub fn script(&self) -> &NukeScript {
        &self.script
    }

    fn node_name(&self, class: &str) -> String {
        let count = self
            .script
            .nodes
            .iter()
            .filter(|n| n.class == class)
            .count();
        format!("{}{}", class, count + 1)
    }

    fn check_stage(&self, stage: StageRef) -> Result<&NukeNode, RenderError> {
        self.script
            .node(stage.0)
            .ok_or(RenderError::UnknownStage(stage))
    }

    fn script_path(&self) -> PathBuf {
        let dir = self
            .config
            .script_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        dir.join(format!("slate_review_{}.nk", Uuid::new_v4()))
    }

    pub fn command_args(&self, write_name: &str, script: &Path, start: i64, end: i64) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.extend([
            "-X".to_string(),
            write_name.to_string(),
            "-F".to_string(),
            format!("{}-{}", start, end),
            script.to_string_lossy().to_string(),
        ]);
        args
    }

    fn run(&self, args: &[String]) -> Result<(), RenderError> {
        let mut command = Command::new(&self.config.executable);
        command.args(args);

        if let Some(plugin_path) = &self.config.plugin_path {
            command.env("NUKE_PATH", plugin_path);
        }

        info!(
            "Running {} {}",
            self.config.executable.display(),
            args.join(" ")
        );

        let output = command.output().map_err(|source| RenderError::Spawn {
            executable: self.config.executable.clone(),
            source,
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("nuke: {}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(20).collect();
            return Err(RenderError::ProcessFailed {
                exit_code: output.status.code(),
                stderr: tail.into_iter().rev().collect::<Vec<_>>().join("\n"),
            });
        }

        Ok(())
    }
}

impl Renderer for NukeScriptRenderer {
    fn name(&self) -> &str {
        "nuke"
    }

    fn configure_scene(
        &mut self,
        fps: f64,
        frame_range: FrameRange,
        color_management: &str,
    ) -> Result<(), RenderError> {
        self.script.set_root("first_frame", Knob::Int(frame_range.first));
        self.script.set_root("last_frame", Knob::Int(frame_range.last));
        self.script.set_root("fps", Knob::Float(fps));
        self.script
            .set_root("colorManagement", Knob::text(color_management));
        self.script
            .set_root("OCIO_config", Knob::text(self.config.ocio_config.as_str()));

        debug!("Configured scene root");
        Ok(())
    }

    fn create_input_stage(
        &mut self,
        path: &Path,
        frame_range: FrameRange,
        colorspace: &str,
    ) -> Result<StageRef, RenderError> {
        let node = NukeNode::new("Read", self.node_name("Read"), None)
            .knob("file", Knob::text(path.to_string_lossy()))
            .knob("first", Knob::Int(frame_range.first))
            .knob("last", Knob::Int(frame_range.last))
            .knob("origfirst", Knob::Int(frame_range.first))
            .knob("origlast", Knob::Int(frame_range.last))
            .knob("colorspace", Knob::text(colorspace))
            .knob("on_error", Knob::text("checkerboard"));

        Ok(StageRef(self.script.add_node(node)))
    }

    fn create_slate_stage(
        &mut self,
        input: StageRef,
        fields: &SlateFields,
    ) -> Result<StageRef, RenderError> {
        self.check_stage(input)?;

        let class = self.config.slate_node_class.clone();
        let mut node = NukeNode::new(&class, self.node_name(&class), Some(input.0));
        for (knob, value) in fields.text_knobs() {
            node = node.knob(knob, Knob::text(value));
        }
        node = node.knob("fps", Knob::Float(fields.fps));

        Ok(StageRef(self.script.add_node(node)))
    }

    fn create_output_stage(
        &mut self,
        input: StageRef,
        path: &Path,
        colorspace: &str,
    ) -> Result<StageRef, RenderError> {
        self.check_stage(input)?;

        let node = NukeNode::new(WRITE_CLASS, self.node_name(WRITE_CLASS), Some(input.0))
            .knob("file", Knob::text(path.to_string_lossy()))
            .knob("colorspace", Knob::text(colorspace));

        Ok(StageRef(self.script.add_node(node)))
    }

    fn execute(&mut self, stage: StageRef, start: i64, end: i64) -> Result<(), RenderError> {
        let node = self.check_stage(stage)?;
        if node.class != WRITE_CLASS {
            return Err(RenderError::Rejected(format!(
                "stage {} is a {} node, only Write nodes can be executed",
                stage, node.class
            )));
        }
        let write_name = node.name.clone();

        let script_path = self.script_path();
        fs::write(&script_path, self.script.to_nk()).map_err(|source| RenderError::Script {
            path: script_path.clone(),
            source,
        })?;
        debug!("Wrote render script {}", script_path.display());

        let args = self.command_args(&write_name, &script_path, start, end);
        let result = self.run(&args);

        if !self.config.keep_script
            && let Err(e) = fs::remove_file(&script_path)
        {
            warn!(
                "Could not remove render script {}: {}",
                script_path.display(),
                e
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fields() -> SlateFields {
        SlateFields {
            project: "it_will_rain".to_string(),
            company: "Film Academy".to_string(),
            file: "pri_0030_v014.%04d.exr".to_string(),
            frame_list: "1001 - 1010 (9)".to_string(),
            date: "14/03/2022 09:05".to_string(),
            artist: "Example User".to_string(),
            task: "comp".to_string(),
            version: "v014".to_string(),
            fps: 25.0,
            colorspace_idt: "ACES - ACEScg".to_string(),
            colorspace_odt: "Output - sRGB".to_string(),
            description: "Integrated DMP".to_string(),
        }
    }

    fn build(renderer: &mut NukeScriptRenderer) -> StageRef {
        let range = FrameRange::new(1001, 1010).unwrap();
        renderer.configure_scene(25.0, range, "OCIO").unwrap();
        let read = renderer
            .create_input_stage(Path::new("/seq/pri_0030.%04d.exr"), range, "ACES - ACEScg")
            .unwrap();
        let slate = renderer.create_slate_stage(read, &fields()).unwrap();
        renderer
            .create_output_stage(slate, Path::new("/out/pri_0030.mov"), "Output - sRGB")
            .unwrap()
    }

    #[test]
    fn test_builds_read_slate_write_chain() {
        let mut renderer = NukeScriptRenderer::new(Config::default_config().renderer);
        let write = build(&mut renderer);

        let classes: Vec<&str> = renderer
            .script()
            .nodes
            .iter()
            .map(|n| n.class.as_str())
            .collect();
        assert_eq!(classes, vec!["Read", "nfaSlate", "Write"]);
        assert_eq!(write, StageRef(2));

        let slate = renderer.script().node(1).unwrap();
        assert_eq!(slate.input, Some(0));
        assert_eq!(slate.get("frameList"), Some(&Knob::text("1001 - 1010 (9)")));
        assert_eq!(slate.get("version"), Some(&Knob::text("v014")));

        let nk = renderer.script().to_nk();
        assert!(nk.contains(" colorManagement \"OCIO\"\n"));
        assert!(nk.contains(" on_error \"checkerboard\"\n"));
        assert!(!nk.contains("push $"));
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let mut renderer = NukeScriptRenderer::new(Config::default_config().renderer);
        let err = renderer
            .create_output_stage(StageRef(7), Path::new("/out/a.mov"), "Output - sRGB")
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownStage(StageRef(7))));
    }

    #[test]
    fn test_execute_requires_write_stage() {
        let mut renderer = NukeScriptRenderer::new(Config::default_config().renderer);
        build(&mut renderer);
        let err = renderer.execute(StageRef(0), 1000, 1010).unwrap_err();
        assert!(matches!(err, RenderError::Rejected(_)));
    }

    #[test]
    fn test_command_args() {
        let mut config = Config::default_config().renderer;
        config.extra_args = vec!["-i".to_string()];
        let renderer = NukeScriptRenderer::new(config);

        assert_eq!(
            renderer.command_args("Write1", Path::new("/tmp/s.nk"), 1000, 1010),
            vec!["-i", "-X", "Write1", "-F", "1000-1010", "/tmp/s.nk"]
        );
    }

    #[test]
    fn test_missing_executable_is_spawn_error_and_script_cleaned() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default_config().renderer;
        config.executable = temp.path().join("no-such-nuke");
        config.script_dir = Some(temp.path().to_path_buf());

        let mut renderer = NukeScriptRenderer::new(config);
        let write = build(&mut renderer);
        let err = renderer.execute(write, 1000, 1010).unwrap_err();

        assert!(matches!(err, RenderError::Spawn { .. }));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
