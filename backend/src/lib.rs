//! Recipe backend library modules.
//!
//! Hexagonal layout: `domain` holds entities, services, and ports;
//! `inbound` adapts HTTP requests onto the services; `outbound` provides
//! Diesel persistence and filesystem media adapters; `server` wires the
//! Actix application together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware re-exported for application wiring.
pub use middleware::trace::Trace;
