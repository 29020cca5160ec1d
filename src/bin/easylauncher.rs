//! Generates a variant's decorated launcher icons from a JSON profile.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use easylauncher::{GenerationProfile, IconOutput};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Profile describing the variant, its filters and its icons.
    profile: PathBuf,

    /// Override the profile's `minSdkVersion`.
    #[arg(long)]
    min_sdk_version: Option<u32>,

    /// Validate the profile without writing anything.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every icon was generated.
fn run(args: &Args) -> easylauncher::Result<bool> {
    let mut profile = GenerationProfile::from_path(&args.profile)?;
    if let Some(version) = args.min_sdk_version {
        profile.min_sdk_version = version;
    }

    let (generator, jobs) = profile.resolve()?;
    if args.check {
        info!(
            "profile `{}` is valid: {} filter(s), {} icon(s)",
            profile.variant,
            generator.filters().len(),
            jobs.len()
        );
        return Ok(true);
    }

    let mut failures = 0;
    for result in generator.generate_all(&jobs) {
        match result {
            Ok(IconOutput::Raster(path)) => info!("{}", path.display()),
            Ok(IconOutput::Adaptive(output)) => info!(
                "{} ({} overlay(s))",
                output.manifest_path.display(),
                output.overlays.len()
            ),
            Err(err) => {
                error!("{err}");
                failures += 1;
            }
        }
    }

    info!(
        "variant `{}`: {} of {} icon(s) generated",
        profile.variant,
        jobs.len() - failures,
        jobs.len()
    );
    Ok(failures == 0)
}
