//! Sathi Backend Library
//!
//! Student burnout risk scoring plus the HTTP services built around it:
//! authentication, the chat assistant, calendar helpers and cohort analytics.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
