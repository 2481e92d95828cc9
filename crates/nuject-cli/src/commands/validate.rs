use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nuject_engine::{Controller, InjectionMode, RunConfig};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// YAML run configuration to check.
    #[arg(long)]
    pub config: PathBuf,
}

/// Builds the full run (configuration, table, channel) without generating
/// anything, so every construction-time error surfaces here.
pub fn run(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    let config = RunConfig::from_yaml_file(&args.config)?;
    let controller = Controller::new(config)?;
    println!("{}", describe(controller.config()));
    println!("configuration ok");
    Ok(())
}

fn describe(config: &RunConfig) -> String {
    let mode = match config.mode {
        InjectionMode::Ranged {
            injection_radius,
            endcap_length,
        } => format!("ranged (radius {injection_radius} m, endcap {endcap_length} m)"),
        InjectionMode::Volume {
            cylinder_radius,
            cylinder_height,
        } => format!("volume (radius {cylinder_radius} m, height {cylinder_height} m)"),
    };
    format!(
        "{} events of {:?} + {:?}, E in [{:e}, {:e}] GeV (gamma {}), {} mode, seed {}",
        config.events,
        config.channel.final_type_1,
        config.channel.final_type_2,
        config.spectrum.min_energy,
        config.spectrum.max_energy,
        config.spectrum.spectral_index,
        mode,
        config.seed_policy.master_seed,
    )
}
