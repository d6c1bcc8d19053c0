//! API client library for moviex.
//!
//! Provides a typed client for the movie catalog REST API together with
//! the response-envelope normalization every caller relies on.

/// Movie catalog API client.
pub mod catalog;
