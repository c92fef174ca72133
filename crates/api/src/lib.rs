//! HTTP API: configuration, routing, request adapters and error mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
