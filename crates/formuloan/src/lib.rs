//! `formuloan` library crate.
//!
//! Loan pre-qualification estimator: engineers model features from a borrower's form
//! submission, scores them with an ensemble classifier, and searches nearby loan terms
//! when the submission is rejected. The `formuloan-api` service wraps this crate.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
