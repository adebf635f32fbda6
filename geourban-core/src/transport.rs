use async_trait::async_trait;
use reqwest::Client;
use std::{collections::BTreeMap, fmt::Debug};

use crate::{error::Result, model::QueryPairs};

/// One outgoing GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query: QueryPairs,
}

/// Status and raw body; the body is decoded only after the status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.http.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let resp = |status| HttpResponse { status, body: String::new() };

        assert!(resp(200).is_success());
        assert!(resp(204).is_success());
        assert!(!resp(302).is_success());
        assert!(!resp(404).is_success());
        assert!(!resp(500).is_success());
    }
}
