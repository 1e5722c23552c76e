//! # API Shared
//!
//! Response types shared by the rackdiag HTTP surfaces.
//!
//! Contains:
//! - `HealthRes` and `HealthService`
//! - JSON views of the diagnostic type registry (`DiagnosticTypeRes`, `FieldSpecRes`)
//! - the error body returned by the gateway (`ErrorRes`)
//!
//! All types derive `utoipa::ToSchema` so they appear in the OpenAPI document.

pub mod health;

use rackdiag_core::{DiagnosticType, FieldSpec};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use health::HealthService;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldSpecRes {
    pub name: String,
    pub label: String,
    pub default: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticTypeRes {
    pub label: String,
    pub value: String,
    pub fields: Vec<FieldSpecRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListDiagnosticsRes {
    pub diagnostics: Vec<DiagnosticTypeRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

impl From<&FieldSpec> for FieldSpecRes {
    fn from(f: &FieldSpec) -> Self {
        Self {
            name: f.name.into(),
            label: f.label.into(),
            default: f.default,
        }
    }
}

impl From<&DiagnosticType> for DiagnosticTypeRes {
    fn from(d: &DiagnosticType) -> Self {
        Self {
            label: d.label.into(),
            value: d.value.into(),
            fields: d.fields.iter().map(FieldSpecRes::from).collect(),
        }
    }
}

impl ListDiagnosticsRes {
    /// The whole registry, in menu order.
    pub fn from_registry() -> Self {
        Self {
            diagnostics: rackdiag_core::schema::diagnostic_types()
                .iter()
                .map(DiagnosticTypeRes::from)
                .collect(),
        }
    }
}
