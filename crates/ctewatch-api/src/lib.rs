// ctewatch-api: Async Rust client for the Chaos Traffic Engine telemetry API
//
// Three read-only snapshot endpoints feed the dashboard (`/api/stats`,
// `/api/chaos`, `/api/dns`); `/api/health` is a liveness probe. Every
// payload field is optional on the wire and decoded leniently, so a
// response either parses into its model or fails as a whole.

pub mod client;
pub mod error;
pub mod lenient;
pub mod models;
pub mod transport;

pub use client::{Endpoint, TelemetryClient};
pub use error::Error;
pub use models::{
    CacheResponse, ChaosResponse, ConnectionsResponse, HealthResponse, ProtocolsResponse,
    RoutingResponse, StatsResponse, TrafficResponse,
};
pub use transport::{TlsMode, TransportConfig};
