use std::collections::BTreeMap;

use crate::{
    config::Config,
    error::{GeoUrbanError, Result},
};

pub const DEFAULT_HOST: &str = "geourban.p.rapidapi.com";

pub const API_KEY_ENV: &str = "X_RAPIDAPI_KEY";
pub const HOST_ENV: &str = "X_RAPIDAPI_HOST";

/// Base URL plus the authentication headers sent with every request.
///
/// Immutable once built; pass it by reference into each service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRapidClient {
    url: String,
    auth_headers: BTreeMap<String, String>,
}

impl GeoRapidClient {
    /// Client for a RapidAPI-hosted service, e.g. `geourban.p.rapidapi.com`.
    pub fn new(host: &str, api_key: &str) -> Self {
        let mut auth_headers = BTreeMap::new();
        auth_headers.insert("X-RapidAPI-Key".to_string(), api_key.to_string());
        auth_headers.insert("X-RapidAPI-Host".to_string(), host.to_string());

        Self::with_url(format!("https://{host}"), auth_headers)
    }

    pub fn with_url(url: impl Into<String>, auth_headers: BTreeMap<String, String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self { url, auth_headers }
    }

    /// Reads the key from `X_RAPIDAPI_KEY` and the host from `X_RAPIDAPI_HOST`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV).ok_or_else(|| {
            GeoUrbanError::Config(format!("Environment variable {API_KEY_ENV} is not set."))
        })?;
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self::new(&host, &api_key))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            GeoUrbanError::Config(
                "No API key configured.\n\
                 Hint: run `geourban configure` and enter your RapidAPI key."
                    .to_string(),
            )
        })?;

        Ok(Self::new(config.host(), api_key))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn auth_headers(&self) -> &BTreeMap<String, String> {
        &self.auth_headers
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapidapi_client_uses_https_and_auth_headers() {
        let client = GeoRapidClient::new(DEFAULT_HOST, "KEY");

        assert_eq!(client.url(), "https://geourban.p.rapidapi.com");
        assert_eq!(client.auth_headers().get("X-RapidAPI-Key").map(String::as_str), Some("KEY"));
        assert_eq!(
            client.auth_headers().get("X-RapidAPI-Host").map(String::as_str),
            Some(DEFAULT_HOST)
        );
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = GeoRapidClient::with_url("http://localhost:8080/", BTreeMap::new());
        assert_eq!(client.endpoint("aggregate"), "http://localhost:8080/aggregate");
    }

    #[test]
    fn from_vars_errors_when_key_missing() {
        let err = GeoRapidClient::from_vars(|_| None).unwrap_err();

        assert!(matches!(err, GeoUrbanError::Config(_)));
        assert!(err.to_string().contains("X_RAPIDAPI_KEY"));
    }

    #[test]
    fn from_vars_falls_back_to_default_host() {
        let client = GeoRapidClient::from_vars(|name| {
            (name == API_KEY_ENV).then(|| "ENV_KEY".to_string())
        })
        .unwrap();

        assert_eq!(client.url(), "https://geourban.p.rapidapi.com");
        assert_eq!(
            client.auth_headers().get("X-RapidAPI-Key").map(String::as_str),
            Some("ENV_KEY")
        );
    }

    #[test]
    fn from_vars_uses_host_override() {
        let client = GeoRapidClient::from_vars(|name| match name {
            API_KEY_ENV => Some("ENV_KEY".to_string()),
            HOST_ENV => Some("traffic.example.org".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(client.url(), "https://traffic.example.org");
        assert_eq!(
            client.auth_headers().get("X-RapidAPI-Host").map(String::as_str),
            Some("traffic.example.org")
        );
    }

    #[test]
    fn from_config_errors_when_missing_api_key() {
        let err = GeoRapidClient::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn from_config_uses_default_host() {
        let cfg = Config { host: None, api_key: Some("KEY".into()) };
        let client = GeoRapidClient::from_config(&cfg).unwrap();
        assert_eq!(client.url(), "https://geourban.p.rapidapi.com");
    }
}
