// file: src/main.rs
// description: commandline application entry point with argument handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use slate_review::utils::logging::{format_error, format_success};
use slate_review::{
    Config, NukeScriptRenderer, PipelineOrchestrator, RenderJob, ShotgridClient,
    ShotgridCredentials, Validator,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "slate-review")]
#[command(version)]
#[command(
    about = "Render a slated review movie for a published frame sequence and post it to ShotGrid",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[arg(allow_negative_numbers = true)]
    first_frame: i64,

    #[arg(allow_negative_numbers = true)]
    last_frame: i64,

    fps: f64,

    publish_id: u64,

    /// Frame template, e.g. /shots/sh010/comp/sh010_comp_v003.%04d.exr
    sequence_path: PathBuf,

    /// Review movie to write and upload
    slate_path: PathBuf,

    site_url: String,

    script_name: String,

    script_key: String,

    company: String,

    colorspace_idt: String,

    colorspace_odt: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    slate_review::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Slate review for publish {}", cli.publish_id);
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration from environment")?
    };

    Validator::validate_site_url(&cli.site_url)?;
    Validator::validate_not_empty("script_name", &cli.script_name)?;
    Validator::validate_not_empty("script_key", &cli.script_key)?;
    Validator::validate_sequence_path(&cli.sequence_path)?;
    Validator::validate_movie_path(&cli.slate_path)?;

    let job = RenderJob::builder(&cli.sequence_path, &cli.slate_path)
        .frames(cli.first_frame, cli.last_frame)
        .fps(cli.fps)
        .colorspaces(cli.colorspace_idt.as_str(), cli.colorspace_odt.as_str())
        .company(cli.company.as_str())
        .build()
        .context("Invalid render arguments")?;

    let tracking = ShotgridClient::new(
        ShotgridCredentials {
            site_url: cli.site_url.clone(),
            script_name: cli.script_name.clone(),
            script_key: cli.script_key.clone(),
        },
        &config.tracking,
    )
    .context("Failed to create ShotGrid client")?;

    let mut renderer = NukeScriptRenderer::new(config.renderer.clone());

    let start_time = Instant::now();
    let result = PipelineOrchestrator::new(&mut renderer, &tracking, config.review.clone())
        .run_for_publish(&job, cli.publish_id);

    match result {
        Ok(outcome) => {
            println!(
                "{}",
                format_success(&format!(
                    "Version {} created for publish {} in {:.1}s",
                    outcome.version_id,
                    cli.publish_id,
                    start_time.elapsed().as_secs_f64()
                ))
            );
            if !outcome.render_succeeded {
                warn!("Render failed; the uploaded movie may be missing or stale");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            Err(e).context("Review run failed")
        }
    }
}
