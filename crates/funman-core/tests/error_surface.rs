use funman_core::errors::{ErrorInfo, FunmanError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "req-1")
        .with_context("reason", "example")
}

#[test]
fn results_error_surface() {
    let err = FunmanError::Results(sample_info("already-finalized", "finalized twice"));
    assert_eq!(err.code(), "already-finalized");
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn dispatch_error_surface() {
    let err = FunmanError::Dispatch(
        sample_info("unsupported-model-kind", "ensemble").with_hint("use a single model"),
    );
    assert_eq!(err.info().hint.as_deref(), Some("use a single model"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("dispatch error: ensemble (code: unsupported-model-kind)"));
    assert!(rendered.contains("id=req-1"));
    assert!(rendered.ends_with("hint: use a single model"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = FunmanError::Interval(ErrorInfo::new("inverted-bounds", "bad"));
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["family"], "Interval");
    assert_eq!(value["detail"]["code"], "inverted-bounds");
    let decoded: FunmanError = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, err);
}
