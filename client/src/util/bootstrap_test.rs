use super::*;

fn config() -> PlatformConfig {
    PlatformConfig::from_json(r#"{"apiKey":"k","projectId":"portal-dev","storageBucket":"portal-dev.appspot.com"}"#)
        .expect("config")
}

#[test]
fn embedded_config_parses_back() {
    let original = config();
    assert_eq!(parse_embedded_config(&embed_config(&original)), Some(original));
}

#[test]
fn embedding_escapes_script_close() {
    let mut cfg = config();
    cfg.app_id = "</script><script>alert(1)".to_owned();
    let embedded = embed_config(&cfg);

    assert!(!embedded.contains("</"));
    assert_eq!(parse_embedded_config(&embedded).map(|c| c.app_id), Some(cfg.app_id));
}

#[test]
fn blank_or_malformed_config_is_none() {
    assert_eq!(parse_embedded_config("  "), None);
    assert_eq!(parse_embedded_config("{not json"), None);
    assert_eq!(parse_embedded_config(r#"{"apiKey":"","projectId":"p","storageBucket":"b"}"#), None);
}
