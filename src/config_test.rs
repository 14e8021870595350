use super::*;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers must hold `ENV_LOCK` so no other test reads the env concurrently.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("BASE_URL");
        std::env::remove_var("TUTORAT_LOCALE");
    }
}

#[test]
fn from_env_defaults_to_localhost_and_french() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { clear_client_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.locale, Locale::Fr);
    assert_eq!(cfg, ClientConfig::default());
}

#[test]
fn from_env_reads_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_client_env();
        std::env::set_var("BASE_URL", "https://tutorat.example.test/api/");
        std::env::set_var("TUTORAT_LOCALE", "en");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://tutorat.example.test/api");
    assert_eq!(cfg.locale, Locale::En);

    unsafe { clear_client_env() };
}

#[test]
fn parse_base_url_empty_falls_back() {
    assert_eq!(parse_base_url(Some("  ")).unwrap(), DEFAULT_BASE_URL);
    assert_eq!(parse_base_url(None).unwrap(), DEFAULT_BASE_URL);
}

#[test]
fn parse_base_url_rejects_relative() {
    let err = parse_base_url(Some("localhost:8080")).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBaseUrl("localhost:8080".to_owned()));
    assert!(err.to_string().contains("invalid BASE_URL"));
}

#[test]
fn parse_locale_unknown_errors() {
    let err = parse_locale(Some("de")).unwrap_err();
    assert!(err.to_string().contains("unknown TUTORAT_LOCALE"));
}

#[test]
fn with_base_url_overrides_and_trims() {
    let cfg = ClientConfig::default().with_base_url("https://api.tutorat.test/").unwrap();
    assert_eq!(cfg.base_url, "https://api.tutorat.test");
    assert_eq!(cfg.locale, Locale::Fr);
    assert!(ClientConfig::default().with_base_url("ftp://nope").is_err());
}
