//! JSON bodies exchanged with the diagnose endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Body of `POST /api/diagnose`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseRequest {
    /// Diagnostic type key, e.g. `low_suction`.
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// Sensor readings keyed by field name.
    pub inputs: BTreeMap<String, f64>,
}

/// Diagnosis returned by the endpoint.
///
/// List and text fields default to empty when the endpoint omits them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisResult {
    pub diagnosis: String,
    /// Shown verbatim; the endpoint usually sends a number between 0 and 1.
    #[schema(value_type = Object)]
    pub confidence: serde_json::Value,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    #[serde(default)]
    pub manual_reference: String,
    #[serde(default)]
    pub llm_summary: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub manual_chunks: Vec<ManualChunk>,
}

/// A manual excerpt the endpoint retrieved for this diagnosis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualChunk {
    pub content: String,
    /// Any further keys (source, page, score) are kept untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
