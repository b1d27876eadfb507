//! Common types and utilities for the csz compiler front end.
//!
//! This crate provides foundational types used across all csz crates:
//! - Stable diagnostic error codes
//! - Source spans (`TextSpan`, `TextChangeRange`)
//! - Centralized limits and thresholds
//! - Cooperative cancellation (`CancellationToken`)

pub mod cancellation;
pub mod diagnostics;
pub mod limits;
pub mod span;

pub use cancellation::{Cancelled, CancellationToken};
pub use span::{TextChangeRange, TextSpan};
