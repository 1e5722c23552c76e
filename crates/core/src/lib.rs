//! # Rackdiag Core
//!
//! Client-side logic for refrigeration rack diagnostics.
//!
//! This crate contains:
//! - the diagnostic type registry (which sensor readings each fault category needs)
//! - the form controller that collects readings and runs the submit lifecycle
//! - the HTTP client for the external `/api/diagnose` endpoint
//! - plain-text rendering of the form and the returned diagnosis
//! - a rack simulator that seeds the form with fault readings
//!
//! **No diagnostic reasoning**: fault rules, manual retrieval and summarisation live behind the
//! diagnose endpoint. Serving HTTP belongs in `api-rest`.

pub mod client;
pub mod config;
pub mod constants;
pub mod form;
pub mod render;
pub mod schema;
pub mod simulator;
pub mod wire;

mod error;

pub use client::{DiagnoseClient, HttpDiagnoseClient};
pub use config::ClientConfig;
pub use error::{DiagError, DiagResult, DiagnoseFailure};
pub use form::{Completion, FormController, PendingSubmission, Phase, RequestToken};
pub use schema::{DiagnosticType, FieldSpec};
pub use wire::{DiagnoseRequest, DiagnosisResult, ManualChunk};
