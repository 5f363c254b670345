use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SplicerError::invalid_target("x")
            .to_string()
            .contains("invalid target:")
    );
    assert!(
        SplicerError::no_content("x")
            .to_string()
            .contains("no content:")
    );
    assert!(
        SplicerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SplicerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(SplicerError::EmptyPool.to_string(), "empty candidate pool");
}

#[test]
fn categories_separate_selection_failures_from_bad_requests() {
    assert_eq!(
        SplicerError::invalid_target("x").category(),
        FailureCategory::NoValidTarget
    );
    assert_eq!(SplicerError::EmptyPool.category(), FailureCategory::NoContent);
    assert_eq!(
        SplicerError::no_content("x").category(),
        FailureCategory::NoContent
    );
    assert_eq!(
        SplicerError::validation("x").category(),
        FailureCategory::InvalidRequest
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SplicerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.category(), FailureCategory::InvalidRequest);
}

#[test]
fn json_errors_convert_to_serde_variant() {
    let e = serde_json::from_str::<u32>("nope").unwrap_err();
    let err: SplicerError = e.into();
    assert!(matches!(err, SplicerError::Serde(_)));
}
