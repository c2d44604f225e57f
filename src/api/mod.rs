//! API Module
//!
//! HTTP handlers and routing for the cache admin REST API.
//!
//! # Endpoints
//! - `PUT /entries`, `GET|DELETE /entries/:key`, `GET /entries/:key/info`
//! - `DELETE /tags/:tag`, `POST /invalidate`, `POST /evict`
//! - `POST /cleanup`, `POST /clear`
//! - `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
