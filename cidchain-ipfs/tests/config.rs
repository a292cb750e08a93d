use std::time::Duration;

use cidchain_ipfs::{
    Endpoint, IpfsConfig, IpfsError, Operation, RetryPolicy, INFURA_API_URL, LOCAL_API_URL,
};

#[test]
fn local_config_uses_default_daemon_url() {
    let config = IpfsConfig::local();
    assert_eq!(config.endpoint().base_url(), LOCAL_API_URL);
    assert!(config.endpoint().credentials().is_none());
    assert_eq!(*config.retry_policy(), RetryPolicy::new(5, Duration::from_secs(1)));
    assert_eq!(
        config.api_url(Operation::DagGet),
        "http://127.0.0.1:5001/api/v0/dag/get"
    );
}

#[test]
fn infura_requires_key_and_secret() {
    let err = IpfsConfig::builder().use_infura(true).build().unwrap_err();
    assert!(matches!(err, IpfsError::Config(_)));
    assert!(err.to_string().contains("Infura API key and secret are required"));

    let err = IpfsConfig::builder()
        .use_infura(true)
        .infura_api_key("key")
        .build()
        .unwrap_err();
    assert!(matches!(err, IpfsError::Config(_)));
}

#[test]
fn infura_rejects_blank_credentials() {
    let err = IpfsConfig::infura("key", "   ").unwrap_err();
    assert!(matches!(err, IpfsError::Config(_)));
}

#[test]
fn infura_config_targets_hosted_gateway() {
    let config = IpfsConfig::infura("key", "secret").unwrap();
    assert!(config.endpoint().is_hosted());
    assert_eq!(config.endpoint().base_url(), INFURA_API_URL);
    let credentials = config.endpoint().credentials().unwrap();
    assert_eq!(credentials.api_key(), "key");
    assert_eq!(credentials.api_secret(), "secret");
    assert_eq!(
        config.api_url(Operation::Cat),
        "https://ipfs.infura.io:5001/api/v0/cat"
    );
}

#[test]
fn api_url_override_applies_and_trims_trailing_slash() {
    let config = IpfsConfig::builder()
        .api_url("http://ipfs.internal:8080/")
        .build()
        .unwrap();
    assert!(matches!(config.endpoint(), Endpoint::Local { .. }));
    assert_eq!(
        config.api_url(Operation::Add),
        "http://ipfs.internal:8080/api/v0/add"
    );
}

#[test]
fn invalid_api_url_is_a_config_error() {
    let err = IpfsConfig::builder().api_url("not a url").build().unwrap_err();
    assert!(matches!(err, IpfsError::Config(message) if message.contains("not a url")));
}

#[test]
fn retry_settings_flow_into_policy() {
    let config = IpfsConfig::builder()
        .max_retries(2)
        .retry_delay(Duration::from_millis(50))
        .build()
        .unwrap();
    assert_eq!(
        *config.retry_policy(),
        RetryPolicy::new(2, Duration::from_millis(50))
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let config = IpfsConfig::infura("very-secret-key", "very-secret-secret").unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("<redacted>"));

    let builder = IpfsConfig::builder().infura_api_key("very-secret-key");
    assert!(!format!("{builder:?}").contains("very-secret"));
}

#[test]
fn env_helpers_read_named_variables() {
    std::env::set_var("CIDCHAIN_TEST_USE_INFURA", "true");
    std::env::set_var("CIDCHAIN_TEST_INFURA_KEY", "env-key");
    std::env::set_var("CIDCHAIN_TEST_INFURA_SECRET", "env-secret");
    std::env::set_var("CIDCHAIN_TEST_API_URL", "https://gateway.example:5001");

    let config = IpfsConfig::builder()
        .use_infura_from_env("CIDCHAIN_TEST_USE_INFURA")
        .infura_api_key_from_env("CIDCHAIN_TEST_INFURA_KEY")
        .infura_api_secret_from_env("CIDCHAIN_TEST_INFURA_SECRET")
        .api_url_from_env("CIDCHAIN_TEST_API_URL")
        .build()
        .unwrap();

    assert!(config.endpoint().is_hosted());
    assert_eq!(config.endpoint().base_url(), "https://gateway.example:5001");
    assert_eq!(config.endpoint().credentials().unwrap().api_key(), "env-key");
}
