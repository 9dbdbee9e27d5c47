//! DDR Summary Server library.
//!
//! This library provides the core functionality for the DDR summary server:
//! the document analysis client, the poll loop, field extraction, role
//! summaries and the HTTP API around them.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
