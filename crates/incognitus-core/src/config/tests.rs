use super::*;

#[test]
fn test_defaults_point_at_production_host() {
    let cfg = Config::default();
    assert_eq!(cfg.backend.base_url, "https://lazez.uz");
    assert_eq!(cfg.i18n.base_url, "https://lazez.uz/miniapp/");
    assert!(cfg.i18n.dir.is_empty());
    assert_eq!(cfg.i18n.detect_timeout_secs, 10);
    assert!(cfg.host.init_data.is_empty());
    assert_eq!(cfg.host.platform, "unknown");
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let toml_str = r#"
        [backend]
        base_url = "http://127.0.0.1:8080"

        [i18n]
        dir = "web/i18n"
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.i18n.dir, "web/i18n");
    assert_eq!(cfg.i18n.prefs_file, "~/.incognitus/prefs.json");
    assert_eq!(cfg.incognitus.log_level, "info");
}

#[test]
fn test_empty_toml_is_default() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.backend.base_url, BackendConfig::default().base_url);
    assert_eq!(cfg.incognitus.data_dir, "~/.incognitus");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__incognitus_test__/config.toml").unwrap();
    assert_eq!(cfg.backend.base_url, "https://lazez.uz");
}

#[test]
fn test_load_rejects_malformed_file() {
    let tmp = std::env::temp_dir().join(format!(
        "__incognitus_test_bad_config_{}__.toml",
        std::process::id()
    ));
    std::fs::write(&tmp, "[backend\nbase_url = 1").unwrap();

    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));

    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_shellexpand_home() {
    let home = std::env::var("HOME").unwrap_or_default();
    if !home.is_empty() {
        assert_eq!(shellexpand("~/x/y"), format!("{home}/x/y"));
    }
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
}
