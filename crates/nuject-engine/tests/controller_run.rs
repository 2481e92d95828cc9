//! Controller lifecycle and failure handling.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use nuject_core::{
    ErrorInfo, FinalStateKinematics, FinalStateSampler, InjectError, ParticleType, RngHandle,
};
use nuject_engine::{
    ChannelConfig, Controller, InjectionMode, MemorySink, Phase, RunConfig, SeedPolicy,
    TableConfig,
};

fn write_flat_table(dir: &Path, final_state: (&str, &str)) -> PathBuf {
    let path = dir.join("xs.json");
    let table = serde_json::json!({
        "final_state": [final_state.0, final_state.1],
        "energies": [1.0e2, 1.0e6],
        "inelasticities": [0.0, 1.0],
        "total": [7.8e-36, 7.8e-36],
        "differential": [[1.0, 1.0], [1.0, 1.0]],
    });
    std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();
    path
}

fn base_config(table: PathBuf) -> RunConfig {
    RunConfig {
        channel: ChannelConfig {
            final_type_1: ParticleType::MuMinus,
            final_type_2: ParticleType::Hadrons,
        },
        events: 50,
        spectrum: Default::default(),
        acceptance: Default::default(),
        mode: InjectionMode::default(),
        table: TableConfig { path: table },
        normalization: 1.0,
        seed_policy: SeedPolicy::default(),
        workers: 1,
    }
}

#[test]
fn run_generates_the_requested_events_with_positive_weights() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path(), ("mu-minus", "hadrons"));
    let mut controller = Controller::new(base_config(table)).unwrap();
    assert_eq!(controller.phase(), Phase::Configured);

    let mut sink = MemorySink::new();
    let summary = controller.run(&mut sink).unwrap();

    assert_eq!(controller.phase(), Phase::Finished);
    assert!(sink.is_closed());
    assert_eq!(summary.events_requested, 50);
    assert_eq!(summary.events_generated, 50);
    assert_eq!(sink.events().len(), 50);
    for event in sink.events() {
        assert!(event.one_weight.is_finite());
        assert!(event.one_weight > 0.0);
    }
    assert!((summary.mean_weight - summary.total_weight / 50.0).abs() < 1e-12);
}

#[test]
fn unreadable_table_fails_construction_before_any_event() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(dir.path().join("missing.json"));
    config.events = 10_000;

    let err = Controller::new(config).unwrap_err();
    match err {
        InjectError::Table(info) => assert_eq!(info.code, "table-read"),
        other => panic!("expected a table error, got {other:?}"),
    }
}

#[test]
fn table_produced_for_another_final_state_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path(), ("e-minus", "hadrons"));

    let err = Controller::new(base_config(table)).unwrap_err();
    match err {
        InjectError::Configuration(info) => {
            assert_eq!(info.code, "channel-table-mismatch");
            assert!(info.context.contains_key("path"));
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn controller_refuses_a_second_run() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path(), ("mu-minus", "hadrons"));
    let mut controller = Controller::new(base_config(table)).unwrap();

    let mut sink = MemorySink::new();
    controller.run(&mut sink).unwrap();

    let err = controller.run(&mut sink).unwrap_err();
    match err {
        InjectError::Configuration(info) => assert_eq!(info.code, "controller-phase"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

/// Sampler whose final-state draw always misses, so every event exhausts
/// its retry cap.
struct NeverAccepts;

impl FinalStateSampler for NeverAccepts {
    fn total_cross_section(&self, _energy: f64) -> Result<f64, InjectError> {
        Ok(7.8e-36)
    }

    fn sample_final_state(
        &self,
        energy: f64,
        _rng: &mut RngHandle,
    ) -> Result<(FinalStateKinematics, f64), InjectError> {
        Err(InjectError::Domain(
            ErrorInfo::new("rejection-exhausted", "no acceptable final state")
                .with_context("energy", format!("{energy}")),
        ))
    }
}

#[test]
fn run_fatal_error_fails_the_controller_and_names_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path(), ("mu-minus", "hadrons"));
    let mut controller =
        Controller::with_sampler(base_config(table), Arc::new(NeverAccepts)).unwrap();

    let mut sink = MemorySink::new();
    let err = controller.run(&mut sink).unwrap_err();

    assert_eq!(controller.phase(), Phase::Failed);
    assert!(sink.events().is_empty());
    assert!(!sink.is_closed());
    match err {
        InjectError::Domain(info) => {
            assert_eq!(info.context["event_index"], "0");
            assert_eq!(info.context["attempts"], "100");
        }
        other => panic!("expected a domain error, got {other:?}"),
    }
}

#[test]
fn cancellation_finishes_cleanly_with_a_short_stream() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_flat_table(dir.path(), ("mu-minus", "hadrons"));
    let mut controller = Controller::new(base_config(table)).unwrap();

    controller.cancel_token().store(true, Ordering::Relaxed);
    let mut sink = MemorySink::new();
    let summary = controller.run(&mut sink).unwrap();

    assert_eq!(controller.phase(), Phase::Finished);
    assert!(sink.is_closed());
    assert_eq!(summary.events_generated, 0);
    assert_eq!(summary.events_requested, 50);
    assert_eq!(summary.mean_weight, 0.0);
}
