//! The `taskguard` library crate.
//!
//! Core business logic for the TaskGuard backend: credential-based
//! registration and login, bearer-token issuance and verification, the
//! per-request identity resolution that gates every task operation, and
//! the ownership-scoped task store itself. The binary (`main.rs`) wires
//! these pieces into an actix-web application.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;
