//! BanditPAM - k-medoids clustering with command-line and Python front ends
//!
//! This library provides the adapter layer between callers and a k-medoids
//! engine: dataset ingestion, loss specifier normalization, a single
//! synchronous fit per invocation, and extraction of medoids, labels and
//! step counts into flat sequences.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod extract;
pub mod loss;
pub mod output;
#[cfg(feature = "python")]
pub mod python;
pub mod scripting;
