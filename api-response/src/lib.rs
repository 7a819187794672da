//! # api-response
//!
//! Consistent JSON response envelopes for axum services.
//!
//! Every response shares one shape, with absent keys omitted:
//!
//! ```json
//! { "message": "...", "body": { ... }, "errors": { ... } }
//! ```
//!
//! ## Features
//!
//! - **Fluent builder**: [`ResponseBuilder`](builder::ResponseBuilder) collects
//!   data, message, errors and status, then sends exactly one envelope
//! - **First-error messages**: without an explicit message, the first
//!   validation error becomes the message
//! - **Helpers**: success, error, pagination and created/updated/destroyed
//!   responses via [`ApiResponse`](responses::ApiResponse)
//! - **Pagination**: length-aware, simple and cursor paginators with item
//!   mappers and named resource transformers
//! - **Localization**: generated messages go through a pluggable
//!   [`Translator`](messages::Translator)
//!
//! ## Example
//!
//! ```rust,no_run
//! use api_response::prelude::*;
//! use axum::{extract::State, routing::get, Router};
//!
//! async fn show(State(_api): State<ApiResponse>) -> EnvelopeResponse {
//!     ApiResponse::success(Some(serde_json::json!({ "id": 1 })), None, StatusCode::OK)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app = Router::new()
//!         .route("/users/1", get(show))
//!         .with_state(ApiResponse::from_config(&config));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod messages;
pub mod observability;
pub mod pagination;
pub mod resources;
pub mod responses;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::{Envelope, EnvelopeResponse, ResponseBuilder};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::messages::{MessageCatalog, MessageTemplates, Template, Translator};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{
        CursorPaginator, LengthAwarePaginator, Paginated, SimplePaginator,
    };
    pub use crate::resources::{Mapper, Resource, Transformer, TransformerRegistry};
    pub use crate::responses::ApiResponse;

    pub use axum::http::StatusCode;
}
