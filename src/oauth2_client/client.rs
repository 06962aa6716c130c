// ABOUTME: Provider OAuth configuration and authorization URL construction with PKCE
// ABOUTME: Derives client settings from a cloud provider record and the console callback URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::pkce::PkceParams;
use crate::constants::oauth::RESPONSE_TYPE_CODE;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::CloudProvider;
use url::Url;

/// Public client settings for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOAuthConfig {
    /// `OAuth` client ID
    pub client_id: String,
    /// Authorization endpoint
    pub auth_url: String,
    /// Requested scopes
    pub scopes: Vec<String>,
    /// Console callback URL registered with the provider
    pub redirect_uri: String,
}

impl ProviderOAuthConfig {
    /// Settings for a provider record
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the provider is inactive or has no `OAuth` settings
    pub fn from_provider(provider: &CloudProvider, redirect_uri: &str) -> AppResult<Self> {
        if !provider.is_active {
            return Err(AppError::invalid_input(format!(
                "Cloud provider {} is not active",
                provider.name
            )));
        }
        let oauth = provider.oauth.as_ref().ok_or_else(|| {
            AppError::invalid_input(format!(
                "Cloud provider {} has no OAuth configuration",
                provider.name
            ))
        })?;
        Ok(Self {
            client_id: oauth.client_id.clone(),
            auth_url: oauth.auth_url.clone(),
            scopes: oauth.scopes.clone(),
            redirect_uri: redirect_uri.to_owned(),
        })
    }
}

/// Builds authorization requests for one provider
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    config: ProviderOAuthConfig,
}

impl OAuth2Client {
    /// Create a client for the given settings
    #[must_use]
    pub const fn new(config: ProviderOAuthConfig) -> Self {
        Self { config }
    }

    /// Client settings
    #[must_use]
    pub const fn config(&self) -> &ProviderOAuthConfig {
        &self.config
    }

    /// Authorization URL carrying the PKCE challenge and the redirect `state`
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the provider's authorization URL does not parse
    pub fn authorization_url(&self, state: &str, pkce: &PkceParams) -> AppResult<String> {
        let mut url = Url::parse(&self.config.auth_url).map_err(|e| {
            AppError::new(
                ErrorCode::ConfigInvalid,
                format!("Invalid provider authorization URL: {e}"),
            )
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", RESPONSE_TYPE_CODE)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.code_challenge)
            .append_pair("code_challenge_method", pkce.code_challenge_method);

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderOAuthSettings;

    fn provider(oauth: Option<ProviderOAuthSettings>) -> CloudProvider {
        CloudProvider {
            id: "cp-1".to_owned(),
            name: "Drive".to_owned(),
            provider_type: Some("google_drive".to_owned()),
            description: None,
            oauth,
            is_active: true,
        }
    }

    #[test]
    fn test_provider_without_oauth_is_rejected() {
        let result = ProviderOAuthConfig::from_provider(&provider(None), "https://c/oauth/callback");
        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_existing_query_parameters_are_preserved() {
        let config = ProviderOAuthConfig::from_provider(
            &provider(Some(ProviderOAuthSettings {
                client_id: "client".to_owned(),
                auth_url: "https://idp.example.com/authorize?prompt=consent".to_owned(),
                token_url: None,
                scopes: vec!["files.read".to_owned(), "offline".to_owned()],
            })),
            "https://console.example.com/oauth/callback",
        )
        .unwrap();
        let pkce = PkceParams::generate();
        let url = OAuth2Client::new(config).authorization_url("st", &pkce).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("prompt".to_owned(), "consent".to_owned())));
        assert!(pairs.contains(&("scope".to_owned(), "files.read offline".to_owned())));
        assert!(!url.contains(&pkce.code_verifier));
    }
}
