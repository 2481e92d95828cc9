use nuject_core::errors::{ErrorInfo, InjectError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("event_index", "17")
        .with_context("energy", "2500.0")
}

#[test]
fn configuration_error_surface() {
    let err = InjectError::Configuration(sample_info("bounds-inverted", "min above max"));
    assert_eq!(err.info().code, "bounds-inverted");
    assert!(err.info().context.contains_key("energy"));
    assert!(!err.is_retryable());
}

#[test]
fn domain_error_surface() {
    let err = InjectError::Domain(sample_info("energy-support", "outside tabulated support"));
    assert_eq!(err.info().code, "energy-support");
    assert!(err.is_retryable());
}

#[test]
fn table_error_surface() {
    let err = InjectError::Table(
        sample_info("table-axes", "non-monotonic energy axis").with_hint("regenerate the table"),
    );
    assert_eq!(err.info().hint.as_deref(), Some("regenerate the table"));
    assert!(!err.is_retryable());
}

#[test]
fn io_error_surface() {
    let err = InjectError::Io(sample_info("sink-append", "write failed"));
    assert_eq!(err.info().code, "sink-append");
    assert!(!err.is_retryable());
}

#[test]
fn display_includes_context() {
    let err = InjectError::Domain(sample_info("energy-support", "outside tabulated support"));
    let text = err.to_string();
    assert!(text.contains("energy-support"));
    assert!(text.contains("event_index=17"));
}
