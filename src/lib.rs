//! MRP API Library
//!
//! Multi-level BOM explosion, shortfall analysis, and purchase requisition
//! drafting over pre-fetched ERP table snapshots.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod snapshots;

use axum::Router;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub snapshots: Arc<snapshots::SnapshotStore>,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Builds the versioned API router. Nested under `/api/v1` by the binary.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/bom", handlers::bom::bom_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/requisitions", handlers::requisitions::requisition_routes())
        .nest("/snapshots", handlers::snapshots::snapshot_routes())
}
