//! API Controller modules
//!
//! Consolidated controllers organized by domain.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pets;
pub mod push;
