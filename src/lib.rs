//! Student Risk API Library
//!
//! This library provides the core functionality for the student dropout-risk
//! tracking API: counselor authentication, assessment assignment filtering,
//! student and assessment creation, and the HTTP client for the external
//! document store that holds every record.
//!
//! # Modules
//!
//! - `assignments`: Assessment assignment filter and dashboard statistics.
//! - `auth`: Credential lookup, login validation and the verifier seam.
//! - `config`: Configuration management.
//! - `dashboard`: Server-rendered counselor dashboard.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models and wire types.
//! - `services`: Record creation services (students, assessments).
//! - `store`: External document store client.

pub mod assignments;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
