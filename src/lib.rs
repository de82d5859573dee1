//! Doorman - Attempt Throttling Service
//!
//! This crate implements a sliding-window attempt throttle with temporary
//! blocking, intended to guard login and other abuse-prone endpoints.
//! Frontends derive an identifier from request metadata (typically the
//! client address), ask the throttle whether a new attempt is permitted,
//! and surface the retry delay to the end user when it is not. State is
//! transient in-memory by design; the throttle exists for short-horizon
//! abuse mitigation, not durable record-keeping.

pub mod bus;
pub mod config;
pub mod error;
pub mod grpc;
pub mod throttle;
