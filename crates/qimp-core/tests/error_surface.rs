use qimp_core::{ErrorInfo, QimpError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("block", "up")
        .with_context("reason", "example")
}

#[test]
fn block_error_surface() {
    let err = QimpError::Block(sample_info("duplicate-block", "block already declared"));
    assert_eq!(err.info().code, "duplicate-block");
    assert!(err.info().context.contains_key("block"));
}

#[test]
fn grid_error_surface() {
    let err = QimpError::Grid(sample_info("invalid-grid", "beta must be positive"));
    assert_eq!(err.info().code, "invalid-grid");
}

#[test]
fn shape_error_surface() {
    let err = QimpError::shape_mismatch("operands disagree on block structure");
    assert_eq!(err.info().code, "shape-mismatch");
    assert!(matches!(err, QimpError::Shape(_)));
}

#[test]
fn spec_error_surface() {
    let err = QimpError::malformed_spec("empty pole list");
    assert_eq!(err.info().code, "malformed-spec");
}

#[test]
fn engine_error_surface() {
    let err = QimpError::Engine(
        sample_info("not-converged", "sampling did not converge").with_hint("increase n_cycles"),
    );
    assert_eq!(err.info().code, "not-converged");
    assert!(err.info().hint.is_some());
}

#[test]
fn state_error_surface() {
    let err = QimpError::State(sample_info("not-ready", "session has not completed"));
    assert_eq!(err.info().code, "not-ready");
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = QimpError::Archive(sample_info("archive-read", "cannot open archive"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Archive\""));
    let back: QimpError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
