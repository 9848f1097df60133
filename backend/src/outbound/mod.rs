//! Outbound adapters implementing the domain ports.

pub mod media;
pub mod persistence;
