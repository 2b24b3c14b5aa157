//! Test generation server library.
//!
//! Stores input sources (user stories, Swagger documents, plain text),
//! generates test cases and automation scripts through a chat-completion
//! provider, and serves them over a REST API with simulated execution
//! and CSV export.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
