// ABOUTME: Unit tests for console environment configuration
// ABOUTME: Loading from environment variables, defaults, and validation failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use tenant_console::config::environment::{
    ConsoleConfig, Environment, IdentityConfig, LogLevel,
};
use tenant_console::constants::env_keys;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

const ALL_KEYS: [&str; 14] = [
    env_keys::HTTP_PORT,
    env_keys::BACKEND_API_URL,
    env_keys::PUBLIC_BASE_URL,
    env_keys::SESSION_JWT_SECRET,
    env_keys::SESSION_JWT_AUDIENCE,
    env_keys::IDP_LOGIN_URL,
    env_keys::IDP_LOGOUT_URL,
    env_keys::LOGIN_ROUTE,
    env_keys::UNAUTHORIZED_ROUTE,
    env_keys::OAUTH_STATE_TTL_SECS,
    env_keys::OAUTH_ALLOW_LEGACY_STATE,
    env_keys::ENVIRONMENT,
    env_keys::LOG_LEVEL,
    env_keys::LOG_FORMAT,
];

fn clean_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

fn env_with_secret() {
    clean_env();
    env::set_var(env_keys::SESSION_JWT_SECRET, SECRET);
}

fn config() -> ConsoleConfig {
    ConsoleConfig::new(
        "http://backend.local/api",
        "http://console.local",
        IdentityConfig::new(SECRET, "http://idp.local/login", "http://idp.local/logout"),
    )
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
    assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
    assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
    assert_eq!(LogLevel::from_str_or_default("verbose"), LogLevel::Info);
    assert_eq!(LogLevel::Warn.to_string(), "warn");
}

#[test]
fn test_environment_parsing() {
    assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    assert!(Environment::Production.is_production());
    assert_eq!(Environment::Testing.to_string(), "testing");
}

#[test]
#[serial]
fn test_session_secret_is_required() {
    clean_env();
    let error = ConsoleConfig::from_env().unwrap_err();
    assert!(error.to_string().contains("SESSION_JWT_SECRET"));
}

#[test]
#[serial]
fn test_defaults_apply() {
    env_with_secret();
    let config = ConsoleConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8080);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.backend_api_url, "http://localhost:3000/api");
    assert_eq!(config.public_base_url, "http://localhost:8080");
    assert_eq!(config.identity.login_url, "http://localhost:8080/auth/login");
    assert_eq!(config.identity.logout_url, "http://localhost:8080/auth/logout");
    assert!(config.identity.audience.is_none());
    assert_eq!(config.routes.login, "/login");
    assert_eq!(config.routes.unauthorized, "/unauthorized");
    assert_eq!(config.oauth.state_ttl_secs, 600);
    assert!(config.oauth.allow_legacy_state);
    assert_eq!(
        config.oauth_redirect_uri(),
        "http://localhost:8080/oauth/callback"
    );
}

#[test]
#[serial]
fn test_values_are_read_and_trimmed() {
    env_with_secret();
    env::set_var(env_keys::HTTP_PORT, "9090");
    env::set_var(env_keys::BACKEND_API_URL, " https://api.example.com/v1/ ");
    env::set_var(env_keys::PUBLIC_BASE_URL, "https://console.example.com/");
    env::set_var(env_keys::SESSION_JWT_AUDIENCE, "console");
    env::set_var(env_keys::LOGIN_ROUTE, "/signin");
    env::set_var(env_keys::OAUTH_STATE_TTL_SECS, "300");
    env::set_var(env_keys::OAUTH_ALLOW_LEGACY_STATE, "off");
    env::set_var(env_keys::ENVIRONMENT, "production");
    env::set_var(env_keys::LOG_LEVEL, "debug");

    let config = ConsoleConfig::from_env().unwrap();
    clean_env();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.backend_api_url, "https://api.example.com/v1");
    assert_eq!(config.public_base_url, "https://console.example.com");
    assert_eq!(config.identity.audience.as_deref(), Some("console"));
    assert_eq!(config.routes.login, "/signin");
    assert_eq!(config.oauth.state_ttl_secs, 300);
    assert!(!config.oauth.allow_legacy_state);
    assert!(config.environment.is_production());
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(
        config.oauth_redirect_uri(),
        "https://console.example.com/oauth/callback"
    );
}

#[test]
#[serial]
fn test_unparseable_values_are_rejected() {
    for (key, value) in [
        (env_keys::HTTP_PORT, "eighty"),
        (env_keys::OAUTH_STATE_TTL_SECS, "-1"),
        (env_keys::OAUTH_ALLOW_LEGACY_STATE, "sometimes"),
    ] {
        env_with_secret();
        env::set_var(key, value);
        let error = ConsoleConfig::from_env().unwrap_err();
        assert!(error.to_string().contains(key), "{key}: {error}");
    }
    clean_env();
}

#[test]
#[serial]
fn test_production_requires_https() {
    env_with_secret();
    env::set_var(env_keys::ENVIRONMENT, "production");
    let error = ConsoleConfig::from_env().unwrap_err();
    clean_env();
    assert!(error.to_string().contains("https"));
}

#[test]
fn test_validation_failures() {
    let mut short_secret = config();
    short_secret.identity.jwt_secret = "short".to_owned();
    assert!(short_secret
        .validate()
        .unwrap_err()
        .to_string()
        .contains("at least 32 bytes"));

    let mut relative_route = config();
    relative_route.routes.unauthorized = "unauthorized".to_owned();
    assert!(relative_route
        .validate()
        .unwrap_err()
        .to_string()
        .contains("UNAUTHORIZED_ROUTE"));

    let mut zero_ttl = config();
    zero_ttl.oauth.state_ttl_secs = 0;
    assert!(zero_ttl.validate().is_err());

    let mut zero_port = config();
    zero_port.http_port = 0;
    assert!(zero_port.validate().is_err());

    let mut bad_backend = config();
    bad_backend.backend_api_url = "not a url".to_owned();
    assert!(bad_backend
        .validate()
        .unwrap_err()
        .to_string()
        .contains("BACKEND_API_URL"));

    assert!(config().validate().is_ok());
}

#[test]
fn test_secrets_stay_out_of_logs() {
    let config = config();
    assert!(!config.summary().contains(SECRET));
    assert!(!format!("{config:?}").contains(SECRET));
    assert!(format!("{:?}", config.identity).contains("[REDACTED]"));
}
