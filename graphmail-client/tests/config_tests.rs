use graphmail_client::{ClientConfig, ClientError, StaticToken, TokenProvider};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;

// ── Config defaults ─────────────────────────────────────────────

#[test]
fn config_defaults() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.api_base_url, "https://graph.microsoft.com/v1.0");
    assert_eq!(cfg.timeout_secs, 60);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_ms, 500);
    assert_eq!(cfg.page_size, 10);
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_url_joins_without_double_slash() {
    let cfg = ClientConfig {
        api_base_url: "http://localhost:8080/v1.0/".to_string(),
        ..Default::default()
    };
    assert_eq!(cfg.url("/me/messages"), "http://localhost:8080/v1.0/me/messages");
    assert_eq!(cfg.url("me/events"), "http://localhost:8080/v1.0/me/events");
}

#[test]
fn config_backoff_is_linear() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.backoff(1), Duration::from_millis(500));
    assert_eq!(cfg.backoff(3), Duration::from_millis(1500));
    assert_eq!(cfg.timeout(), Duration::from_secs(60));
}

#[test]
fn config_serde_roundtrip() {
    let cfg = ClientConfig {
        page_size: 50,
        ..Default::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, cfg);
}

// ── Validation ──────────────────────────────────────────────────

#[test]
fn config_rejects_non_http_base() {
    let cfg = ClientConfig {
        api_base_url: "graph.microsoft.com".to_string(),
        ..Default::default()
    };
    assert!(matches!(cfg.validate(), Err(ClientError::Config(_))));
}

#[test]
fn config_rejects_zero_page_size_and_timeout() {
    let cfg = ClientConfig {
        page_size: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
    let cfg = ClientConfig {
        timeout_secs: 0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

// ── File loading ────────────────────────────────────────────────

#[test]
fn config_file_overrides_only_given_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "max_retries": 0, "page_size": 25 }}"#).unwrap();

    let cfg = ClientConfig::from_json_file(file.path()).unwrap();
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.page_size, 25);
    assert_eq!(cfg.api_base_url, "https://graph.microsoft.com/v1.0");
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn config_file_with_bad_json_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "max_retries = 2").unwrap();
    assert!(matches!(
        ClientConfig::from_json_file(file.path()),
        Err(ClientError::Config(_))
    ));
}

#[test]
fn config_file_is_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "page_size": 0 }}"#).unwrap();
    assert!(ClientConfig::from_json_file(file.path()).is_err());
}

#[test]
fn missing_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClientConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

// ── Tokens ──────────────────────────────────────────────────────

#[tokio::test]
async fn static_token_returns_value() {
    let token = StaticToken::new("abc");
    assert_eq!(token.access_token().await.unwrap(), "abc");
}

#[tokio::test]
async fn empty_static_token_is_auth_error() {
    let token = StaticToken::new("");
    assert!(matches!(
        token.access_token().await,
        Err(ClientError::Auth(_))
    ));
}

#[test]
fn static_token_debug_is_redacted() {
    let debug = format!("{:?}", StaticToken::new("secret-value"));
    assert!(!debug.contains("secret-value"));
}

#[test]
fn static_token_from_missing_env_var() {
    let err = StaticToken::from_env("GRAPHMAIL_TEST_TOKEN_THAT_IS_NEVER_SET").unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)));
}
