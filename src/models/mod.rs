//! Request and Response models for the cache admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{EvictRequest, InvalidateRequest, SetRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, EvictResponse, GetResponse, HealthResponse, MessageResponse,
    RemovedResponse, SetResponse, StatsResponse,
};
