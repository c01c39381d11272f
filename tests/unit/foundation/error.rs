use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RaceError::invalid_dataset("x")
            .to_string()
            .contains("invalid dataset:")
    );
    assert!(RaceError::config("x").to_string().contains("config error:"));
    assert!(
        RaceError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(RaceError::sink("x").to_string().contains("sink error:"));
    assert!(
        RaceError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RaceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
