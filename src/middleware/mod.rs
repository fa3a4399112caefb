// src/middleware/mod.rs

pub mod request_tracing;

pub use request_tracing::{trace_requests, REQUEST_ID_HEADER};
