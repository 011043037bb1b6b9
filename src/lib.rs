//! Licenser library
//!
//! This module exposes the workflow building blocks for use in integration
//! tests.

pub mod alfred;
pub mod cache;
pub mod cli;
pub mod data;
pub mod personalize;
pub mod workflow;
