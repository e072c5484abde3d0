use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GobanError::record("x")
            .to_string()
            .contains("record error:")
    );
    assert!(
        GobanError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        GobanError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        GobanError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GobanError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
