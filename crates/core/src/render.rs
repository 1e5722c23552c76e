//! Plain-text rendering of the form and its result panel.

use crate::constants::MANUAL_CHUNK_PREVIEW_CHARS;
use crate::form::FormController;
use crate::simulator::RackState;
use crate::wire::DiagnosisResult;
use crate::DiagnoseFailure;
use std::fmt::Write;

/// Marks the safety warning line so it stands out from the rest of the panel.
pub const SAFETY_WARNING_MARKER: &str = "!!";

/// Render the current form: selected type, then one line per field.
pub fn render_form(form: &FormController) -> String {
    let selected = form.selected();
    let mut out = format!("Diagnostic Type: {} ({})\n", selected.label, selected.value);

    for field in form.fields() {
        let shown = match (form.invalid_text(field.name), form.field_value(field.name)) {
            (Some(raw), _) => format!("{raw:?} [invalid]"),
            (None, Some(value)) => format_number(value),
            (None, None) => String::new(),
        };
        let _ = writeln!(out, "  {}: {} [{}, required]", field.label, shown, field.name);
    }

    if form.is_submitting() {
        out.push_str("Diagnosing...\n");
    }

    out
}

/// Render a diagnosis as the result panel.
///
/// The safety warning line only appears when the endpoint returned warnings.
pub fn render_result(result: &DiagnosisResult) -> String {
    let mut out = String::from("Diagnosis Result\n");

    let confidence = match &result.confidence {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let _ = writeln!(out, "Diagnosis: {}", result.diagnosis);
    let _ = writeln!(out, "Confidence: {confidence}");
    let _ = writeln!(out, "Next Steps: {}", result.next_steps.join(", "));
    if !result.safety_warnings.is_empty() {
        let _ = writeln!(
            out,
            "{SAFETY_WARNING_MARKER} Safety Warnings: {}",
            result.safety_warnings.join(", ")
        );
    }
    let _ = writeln!(out, "Manual Reference: {}", result.manual_reference);
    let _ = writeln!(out, "\nLLM Summary\n{}", result.llm_summary);
    out.push_str("\nManual Chunks\n");
    for chunk in &result.manual_chunks {
        let preview: String = chunk.content.chars().take(MANUAL_CHUNK_PREVIEW_CHARS).collect();
        let _ = writeln!(out, "  - {preview}...");
    }

    out
}

pub fn render_failure(failure: &DiagnoseFailure) -> String {
    format!("Diagnosis failed: {failure}\n")
}

/// The result panel for whatever the controller currently holds, if anything.
pub fn render_outcome(form: &FormController) -> Option<String> {
    if let Some(failure) = form.last_failure() {
        return Some(render_failure(failure));
    }
    form.result().map(render_result)
}

/// Render a simulated rack state: one line per reading, then active alarms.
pub fn render_rack_state(state: &RackState) -> String {
    let mut out = String::from("Current System State\n");
    for (name, value) in state.readings() {
        let _ = writeln!(out, "  {name:<24} {value:.1}");
    }
    if !state.alarms.is_empty() {
        let _ = writeln!(
            out,
            "{SAFETY_WARNING_MARKER} Active Alarms: {}",
            state.alarms.join(", ")
        );
    }
    out
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
