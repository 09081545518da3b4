use super::*;

#[test]
fn port_defaults_when_unset_or_blank() {
    assert_eq!(port_from(None), Ok(DEFAULT_PORT));
    assert_eq!(port_from(Some("  ")), Ok(DEFAULT_PORT));
}

#[test]
fn port_parses_trimmed_value() {
    assert_eq!(port_from(Some(" 8080 ")), Ok(8080));
}

#[test]
fn port_rejects_garbage() {
    let err = port_from(Some("http")).unwrap_err();
    assert!(err.starts_with("PORT=http"), "unexpected error: {err}");
    assert!(port_from(Some("70000")).is_err());
}
