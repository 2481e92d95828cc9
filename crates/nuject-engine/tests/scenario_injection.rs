//! An up-going muon-neutrino run with a restricted angular window.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use nuject_core::ParticleType;
use nuject_engine::{
    AcceptanceConfig, ChannelConfig, Controller, InjectionMode, MemorySink, RunConfig, SeedPolicy,
    SpectrumConfig, TableConfig,
};

fn write_flat_table(dir: &Path) -> PathBuf {
    let path = dir.join("xs.json");
    let table = serde_json::json!({
        "final_state": ["mu-minus", "hadrons"],
        "energies": [1.0e2, 1.0e6],
        "inelasticities": [0.0, 1.0],
        "total": [7.8e-36, 7.8e-36],
        "differential": [[1.0, 1.0], [1.0, 1.0]],
    });
    std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();
    path
}

fn upgoing_config(table: PathBuf, mode: InjectionMode) -> RunConfig {
    RunConfig {
        channel: ChannelConfig {
            final_type_1: ParticleType::MuMinus,
            final_type_2: ParticleType::Hadrons,
        },
        events: 100,
        spectrum: SpectrumConfig {
            min_energy: 1.0e3,
            max_energy: 1.0e5,
            spectral_index: 2.0,
        },
        acceptance: AcceptanceConfig {
            min_zenith: 80.0_f64.to_radians(),
            max_zenith: PI,
            min_azimuth: 0.0,
            max_azimuth: PI,
        },
        mode,
        table: TableConfig { path: table },
        normalization: 1.0,
        seed_policy: SeedPolicy::default(),
        workers: 1,
    }
}

fn assert_events_within_scenario(config: RunConfig) {
    let mode = config.mode;
    let mut controller = Controller::new(config).unwrap();
    let mut sink = MemorySink::new();
    let summary = controller.run(&mut sink).unwrap();

    assert_eq!(summary.events_generated, 100);
    for event in sink.events() {
        assert!(event.energy >= 1.0e3 && event.energy <= 1.0e5);
        assert!(event.zenith >= 80.0_f64.to_radians() && event.zenith <= PI);
        assert!(event.azimuth >= 0.0 && event.azimuth <= PI);
        assert!(event.kinematics.inelasticity >= 0.0 && event.kinematics.inelasticity <= 1.0);
        assert!(event.one_weight.is_finite() && event.one_weight > 0.0);
        for component in event.vertex {
            assert!(component.is_finite());
        }
        if let InjectionMode::Volume {
            cylinder_radius,
            cylinder_height,
        } = mode
        {
            // The cylinder is centred on the origin, so every vertex lies
            // inside its bounding sphere regardless of orientation.
            let bound = (cylinder_radius.powi(2) + (cylinder_height / 2.0).powi(2)).sqrt();
            let distance = event
                .vertex
                .iter()
                .map(|component| component * component)
                .sum::<f64>()
                .sqrt();
            assert!(distance <= bound + 1e-9);
        }
    }
}

#[test]
fn ranged_scenario_respects_every_configured_bound() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path());
    assert_events_within_scenario(upgoing_config(
        table,
        InjectionMode::Ranged {
            injection_radius: 1200.0,
            endcap_length: 1200.0,
        },
    ));
}

#[test]
fn volume_scenario_respects_every_configured_bound() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path());
    assert_events_within_scenario(upgoing_config(
        table,
        InjectionMode::Volume {
            cylinder_radius: 600.0,
            cylinder_height: 1000.0,
        },
    ));
}
