//! Core library for the `geourban` CLI.
//!
//! This crate defines:
//! - Client construction & credentials handling
//! - Typed parameters for the four geourban services
//! - The HTTP transport seam and the service calls themselves
//!
//! Payloads are returned as raw `serde_json::Value`s; nothing here interprets them.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod services;
pub mod transport;

pub use client::GeoRapidClient;
pub use config::Config;
pub use error::{GeoUrbanError, Result};
pub use model::{AggregateParams, GridType, OutFormat, QueryParams, TopParams, VehicleType};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
