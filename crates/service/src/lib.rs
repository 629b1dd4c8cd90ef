//! Query services over the cached and aggregation repositories.
//!
//! Provides the public error taxonomy, pagination rules, environment
//! configuration, tracing/metrics setup and the [`AppContext`] that wires
//! stores, caches and services together once at start-up.

pub mod aggregate;
pub mod config;
pub mod context;
pub mod error;
pub mod pagination;
pub mod service;
pub mod telemetry;

pub use aggregate::AggregateService;
pub use config::{Config, LogFormat};
pub use context::AppContext;
pub use error::{Result, ServiceError};
pub use pagination::{DEFAULT_LIMIT, Page};
pub use service::{Service, parse_id};
