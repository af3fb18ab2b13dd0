//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] : one submitted question and its identity
//! - [`error::DomainError`] : domain-level errors

pub mod error;
pub mod question;
