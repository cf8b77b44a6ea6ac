use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LenticularError::invalid_parameter("x")
            .to_string()
            .contains("invalid parameter:")
    );
    assert!(
        LenticularError::source_not_ready("x")
            .to_string()
            .contains("source not ready:")
    );
    assert!(
        LenticularError::degenerate_geometry("x")
            .to_string()
            .contains("degenerate geometry:")
    );
    assert!(LenticularError::draw("x").to_string().contains("draw error:"));
    assert!(
        LenticularError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LenticularError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LenticularError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_geometry_and_readiness_errors_are_quiet_skips() {
    assert!(LenticularError::degenerate_geometry("x").is_frame_skip());
    assert!(LenticularError::source_not_ready("x").is_frame_skip());
    assert!(LenticularError::invalid_parameter("x").is_frame_skip());
    assert!(!LenticularError::draw("x").is_frame_skip());
    assert!(!LenticularError::Other(anyhow::anyhow!("x")).is_frame_skip());
}
