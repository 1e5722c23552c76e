//! Form controller.
//!
//! [`FormController`] owns everything the diagnostics form shows: the selected diagnostic type,
//! the values the user has entered, the last diagnosis (or failure) and whether a request is in
//! flight. State only changes through the transition methods below.
//!
//! ## Submission lifecycle
//!
//! ```text
//! Idle --begin_submit--> Submitting(token) --complete(token)--> Idle
//!                              |
//!                              +--select_diagnostic_type / abandon--> Idle (token retired)
//! ```
//!
//! Every submission gets a fresh [`RequestToken`]. A completion whose token is no longer current
//! is discarded, so a slow response can never overwrite a form the user has since moved on from.
//!
//! ## Payload policy
//!
//! The input state holds only values the user entered. The request payload always carries every
//! field of the selected type: the entered value when there is one, the declared default
//! otherwise.

use crate::client::DiagnoseClient;
use crate::schema::{self, DiagnosticType, FieldSpec};
use crate::wire::{DiagnoseRequest, DiagnosisResult};
use crate::{DiagError, DiagResult, DiagnoseFailure};
use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting(RequestToken),
}

/// A submission that has been started and is waiting for its outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSubmission {
    pub token: RequestToken,
    pub request: DiagnoseRequest,
}

/// What [`FormController::complete`] did with an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug)]
pub struct FormController {
    selected: &'static DiagnosticType,
    inputs: BTreeMap<String, f64>,
    invalid: BTreeMap<String, String>,
    result: Option<DiagnosisResult>,
    last_failure: Option<DiagnoseFailure>,
    phase: Phase,
    next_token: u64,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    /// Creates a controller with the first registry entry selected and nothing entered.
    pub fn new() -> Self {
        Self {
            selected: schema::default_type(),
            inputs: BTreeMap::new(),
            invalid: BTreeMap::new(),
            result: None,
            last_failure: None,
            phase: Phase::Idle,
            next_token: 1,
        }
    }

    pub fn selected(&self) -> &'static DiagnosticType {
        self.selected
    }

    /// Fields of the selected type, in display order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.selected.fields
    }

    /// Values the user has entered for the selected type.
    pub fn input_state(&self) -> &BTreeMap<String, f64> {
        &self.inputs
    }

    /// The value a field currently shows: the entered value, or its default.
    ///
    /// Returns `None` for fields not in the selected type and for fields marked invalid.
    pub fn field_value(&self, name: &str) -> Option<f64> {
        let spec = self.selected.field(name)?;
        if self.invalid.contains_key(name) {
            return None;
        }
        Some(self.inputs.get(name).copied().unwrap_or(spec.default))
    }

    /// Raw text of a rejected field value, if the field is marked invalid.
    pub fn invalid_text(&self, name: &str) -> Option<&str> {
        self.invalid.get(name).map(String::as_str)
    }

    pub fn invalid_fields(&self) -> Vec<String> {
        self.invalid.keys().cloned().collect()
    }

    pub fn result(&self) -> Option<&DiagnosisResult> {
        self.result.as_ref()
    }

    pub fn last_failure(&self) -> Option<&DiagnoseFailure> {
        self.last_failure.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    /// Switch to another diagnostic type.
    ///
    /// Entered values and invalid marks are dropped. The displayed result stays. A submission in
    /// flight is retired: its outcome will be discarded when it arrives. Selecting the type that
    /// is already selected changes nothing.
    pub fn select_diagnostic_type(&mut self, key: &str) -> DiagResult<()> {
        let selected =
            schema::find(key).ok_or_else(|| DiagError::UnknownDiagnosticType(key.to_string()))?;

        if selected.value == self.selected.value {
            return Ok(());
        }

        if let Phase::Submitting(token) = self.phase {
            tracing::debug!(token = token.get(), "retiring in-flight submission on type change");
            self.phase = Phase::Idle;
        }

        self.selected = selected;
        self.inputs.clear();
        self.invalid.clear();
        tracing::debug!(diagnostic_type = selected.value, "diagnostic type selected");
        Ok(())
    }

    /// Record a value typed into a field of the selected type.
    ///
    /// Text that does not parse as a finite number is rejected: the field is marked invalid, any
    /// earlier value for it is dropped and submission is blocked until it is corrected.
    pub fn set_field_value(&mut self, name: &str, raw: &str) -> DiagResult<f64> {
        let spec = self.field_spec(name)?;

        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => self.set_field_number(spec.name, value),
            _ => {
                self.inputs.remove(spec.name);
                self.invalid.insert(spec.name.to_string(), raw.to_string());
                Err(DiagError::InvalidNumber {
                    field: spec.name.to_string(),
                    raw: raw.to_string(),
                })
            }
        }
    }

    /// Record an already numeric value, e.g. a simulated reading.
    ///
    /// Non-finite values are rejected without touching the field.
    pub fn set_field_number(&mut self, name: &str, value: f64) -> DiagResult<f64> {
        let spec = self.field_spec(name)?;

        if !value.is_finite() {
            return Err(DiagError::InvalidNumber {
                field: spec.name.to_string(),
                raw: value.to_string(),
            });
        }

        self.invalid.remove(spec.name);
        self.inputs.insert(spec.name.to_string(), value);
        Ok(value)
    }

    fn field_spec(&self, name: &str) -> DiagResult<&'static FieldSpec> {
        self.selected
            .field(name)
            .ok_or_else(|| DiagError::UnknownField {
                diagnostic_type: self.selected.value.to_string(),
                field: name.to_string(),
            })
    }

    /// The request body a submission would send right now.
    pub fn payload(&self) -> DiagnoseRequest {
        let inputs = self
            .selected
            .fields
            .iter()
            .map(|f| {
                let value = self.inputs.get(f.name).copied().unwrap_or(f.default);
                (f.name.to_string(), value)
            })
            .collect();

        DiagnoseRequest {
            diagnostic_type: self.selected.value.to_string(),
            inputs,
        }
    }

    /// Start a submission: Idle -> Submitting.
    ///
    /// Clears the displayed result and last failure. Refused while another submission is in flight
    /// or while any field is invalid.
    pub fn begin_submit(&mut self) -> DiagResult<PendingSubmission> {
        if self.is_submitting() {
            return Err(DiagError::SubmitInFlight);
        }
        if !self.invalid.is_empty() {
            return Err(DiagError::InvalidFields(self.invalid_fields()));
        }

        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.phase = Phase::Submitting(token);
        self.result = None;
        self.last_failure = None;

        tracing::info!(
            token = token.get(),
            diagnostic_type = self.selected.value,
            "submitting diagnose request"
        );

        Ok(PendingSubmission {
            token,
            request: self.payload(),
        })
    }

    /// Finish a submission: Submitting -> Idle.
    ///
    /// The outcome is applied only when `token` is the submission still in flight.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<DiagnosisResult, DiagnoseFailure>,
    ) -> Completion {
        if self.phase != Phase::Submitting(token) {
            tracing::debug!(token = token.get(), "discarding stale diagnose outcome");
            return Completion::Discarded;
        }

        self.phase = Phase::Idle;
        match outcome {
            Ok(result) => {
                tracing::info!(token = token.get(), diagnosis = %result.diagnosis, "diagnosis received");
                self.result = Some(result);
            }
            Err(failure) => {
                tracing::warn!(token = token.get(), error = %failure, "diagnose request failed");
                self.last_failure = Some(failure);
            }
        }
        Completion::Applied
    }

    /// Give up on the submission in flight, if any, and return to Idle.
    pub fn abandon(&mut self) -> bool {
        match self.phase {
            Phase::Submitting(token) => {
                tracing::info!(token = token.get(), "abandoning diagnose request");
                self.phase = Phase::Idle;
                true
            }
            Phase::Idle => false,
        }
    }

    /// Run one full submission against `client`, bounded by `timeout`.
    pub async fn submit(
        &mut self,
        client: &dyn DiagnoseClient,
        timeout: Duration,
    ) -> DiagResult<Completion> {
        let pending = self.begin_submit()?;

        let outcome = match tokio::time::timeout(timeout, client.diagnose(&pending.request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(DiagnoseFailure::Timeout(timeout)),
        };

        Ok(self.complete(pending.token, outcome))
    }
}
