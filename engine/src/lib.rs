//! Roster Engine Library
//!
//! This library provides the core functionality of the roster team balancing
//! engine. It is used by both the main binary and integration tests.

/// Team balancing engine
pub mod balancing;

/// Configuration management module
pub mod config;

/// Database persistence module
pub mod db;

/// Team building service and store abstraction
pub mod service;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
