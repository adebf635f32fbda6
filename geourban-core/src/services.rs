//! The four geourban operations.
//!
//! Each call validates its parameters, issues exactly one GET against
//! `{client.url}/{path}` and returns the decoded body untouched.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    client::GeoRapidClient,
    error::{GeoUrbanError, Result},
    model::{AggregateParams, QueryPairs, QueryParams, TopParams},
    transport::{HttpRequest, Transport},
};

/// Spatially enabled traffic grid of aggregated simulated movements.
pub async fn aggregate(
    client: &GeoRapidClient,
    transport: &dyn Transport,
    params: &AggregateParams,
) -> Result<Value> {
    dispatch(client, transport, "aggregate", params.query_pairs()).await
}

/// Simulated agent positions within `meters` of a location and `seconds` of a timestamp.
pub async fn query(
    client: &GeoRapidClient,
    transport: &dyn Transport,
    params: &QueryParams,
) -> Result<Value> {
    params.validate()?;
    dispatch(client, transport, "query", params.query_pairs()).await
}

/// Catalog of available simulations (region and simulation date).
pub async fn simulations(client: &GeoRapidClient, transport: &dyn Transport) -> Result<Value> {
    dispatch(client, transport, "simulations", Vec::new()).await
}

/// Top most accumulated traffic grid cells for a region.
pub async fn top(
    client: &GeoRapidClient,
    transport: &dyn Transport,
    params: &TopParams,
) -> Result<Value> {
    dispatch(client, transport, "top", params.query_pairs()).await
}

async fn dispatch(
    client: &GeoRapidClient,
    transport: &dyn Transport,
    path: &str,
    query: QueryPairs,
) -> Result<Value> {
    let request = HttpRequest {
        url: client.endpoint(path),
        headers: client.auth_headers().clone(),
        query,
    };
    debug!(path, params = request.query.len(), "sending geourban request");

    let response = transport.get(&request).await?;

    if !response.is_success() {
        warn!(path, status = response.status, "geourban request failed");
        return Err(GeoUrbanError::Status { status: response.status, body: response.body });
    }

    Ok(serde_json::from_str(&response.body)?)
}
