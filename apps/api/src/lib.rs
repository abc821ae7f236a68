//! # Shoebox API
//!
//! HTTP/JSON surface of the back office.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Routes                                    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /stock        │  │  /sales        │  │  /rates                    ││
//! │  │ • quantity     │  │ • create       │  │ • set                      ││
//! │  │ • low          │  │ • get / delete │  │ • current                  ││
//! │  │ • replenish    │  │ • bulk delete  │  │ • history                  ││
//! │  │ • movements    │  │ • stats, owner │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /suppliers    │  │  /purchases    │  │  /payments                 ││
//! │  │ • create, list │  │ • create, get  │  │ • create                   ││
//! │  │ • balance      │  │ • todo / done  │  │ • delete                   ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  /products (catalog)                     /health                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`].

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use shoebox_engine::Engine;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Engine,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(engine: Engine, config: ApiConfig) -> Self {
        AppState {
            engine,
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with state attached.
pub fn router(state: AppState) -> Router {
    routes::router().with_state(state)
}
