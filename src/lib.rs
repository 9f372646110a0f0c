//! Predixa Price Prediction Library
//!
//! Offline training of single-feature price models, and an HTTP service that
//! serves their predictions and records each one in SQLite.

pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod persistence;
pub mod server;
