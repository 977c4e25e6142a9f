//! API handlers for the stringing order service.
//!
//! This module organizes the service's route handlers. Order endpoints
//! live under `orders`, liveness and readiness probes under `root` and
//! `health`.

pub mod health;
pub mod orders;
pub mod root;
