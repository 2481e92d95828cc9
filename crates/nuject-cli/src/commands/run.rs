use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use nuject_engine::{Controller, JsonLinesSink, RunConfig, RunManifest};

use super::degrees_to_radians;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML run configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Event output file, newline-delimited JSON.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the configured master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the configured event count.
    #[arg(long)]
    pub events: Option<usize>,
    /// Override the configured worker count.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Override the minimum zenith, in degrees.
    #[arg(long = "min-zenith-deg")]
    pub min_zenith_deg: Option<f64>,
    /// Override the maximum zenith, in degrees.
    #[arg(long = "max-zenith-deg")]
    pub max_zenith_deg: Option<f64>,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let mut config = RunConfig::from_yaml_file(&args.config)?;
    apply_overrides(&mut config, args);

    let mut controller = Controller::new(config.clone())?;
    let mut sink = JsonLinesSink::open(&args.out)?;
    let summary = controller.run(&mut sink)?;

    let manifest = RunManifest {
        master_seed: config.seed_policy.master_seed,
        seed_label: config.seed_policy.label.clone(),
        events_generated: summary.events_generated,
        output_file: Some(args.out.clone()),
        complete: summary.events_generated == summary.events_requested,
        config,
    };
    manifest.write(&manifest_path(&args.out))?;

    println!(
        "generated {} events (mean weight {:.6e}, {} retries) -> {}",
        summary.events_generated,
        summary.mean_weight,
        summary.retries,
        args.out.display()
    );
    Ok(())
}

fn apply_overrides(config: &mut RunConfig, args: &RunArgs) {
    if let Some(seed) = args.seed {
        config.seed_policy.master_seed = seed;
    }
    if let Some(events) = args.events {
        config.events = events;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(min_zenith) = args.min_zenith_deg {
        config.acceptance.min_zenith = degrees_to_radians(min_zenith);
    }
    if let Some(max_zenith) = args.max_zenith_deg {
        config.acceptance.max_zenith = degrees_to_radians(max_zenith);
    }
}

fn manifest_path(out: &Path) -> PathBuf {
    out.with_extension("manifest.json")
}
