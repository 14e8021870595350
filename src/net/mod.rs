//! Networking modules for the tutoring REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the credentialed request helper, `api` wraps individual backend
//! routes, `types` defines the wire schema, and `error` the failure types
//! shared by all three.

pub mod api;
pub mod error;
pub mod http;
pub mod types;
