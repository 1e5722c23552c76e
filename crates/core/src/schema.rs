//! Diagnostic type registry.
//!
//! Each diagnostic type names a refrigeration fault category and the sensor readings the diagnose
//! endpoint needs for it. The registry is fixed at compile time; adding a diagnostic type means
//! adding an entry to [`DIAGNOSTICS`].

use crate::{DiagError, DiagResult};
use std::collections::BTreeMap;

/// One required numeric input of a diagnostic type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub default: f64,
}

/// A diagnostic type with its ordered input fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagnosticType {
    pub label: &'static str,
    pub value: &'static str,
    pub fields: &'static [FieldSpec],
}

impl DiagnosticType {
    /// Look up a field of this type by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// All diagnostic types, in menu order. The first entry is selected initially.
pub const DIAGNOSTICS: &[DiagnosticType] = &[
    DiagnosticType {
        label: "Low Suction Pressure",
        value: "low_suction",
        fields: &[
            FieldSpec {
                name: "suction_pressure",
                label: "Suction Pressure (psi)",
                default: 38.0,
            },
            FieldSpec {
                name: "superheat",
                label: "Superheat (F)",
                default: 25.0,
            },
            FieldSpec {
                name: "compressor_temp",
                label: "Compressor Temp (F)",
                default: 230.0,
            },
        ],
    },
    DiagnosticType {
        label: "High Head Pressure",
        value: "high_head",
        fields: &[
            FieldSpec {
                name: "head_pressure",
                label: "Head (Discharge) Pressure (psi)",
                default: 280.0,
            },
            FieldSpec {
                name: "ambient_temp",
                label: "Ambient Temp (F)",
                default: 85.0,
            },
        ],
    },
    DiagnosticType {
        label: "High Superheat",
        value: "high_superheat",
        fields: &[
            FieldSpec {
                name: "superheat",
                label: "Superheat (F)",
                default: 25.0,
            },
            FieldSpec {
                name: "suction_pressure",
                label: "Suction Pressure (psi)",
                default: 38.0,
            },
        ],
    },
    DiagnosticType {
        label: "Low Subcooling",
        value: "low_subcooling",
        fields: &[FieldSpec {
            name: "subcooling",
            label: "Subcooling (F)",
            default: 3.0,
        }],
    },
];

pub fn diagnostic_types() -> &'static [DiagnosticType] {
    DIAGNOSTICS
}

/// Find a diagnostic type by its key.
pub fn find(key: &str) -> Option<&'static DiagnosticType> {
    DIAGNOSTICS.iter().find(|d| d.value == key)
}

pub fn default_type() -> &'static DiagnosticType {
    &DIAGNOSTICS[0]
}

/// Check that `inputs` holds exactly the fields of `diagnostic_type`, each a finite number.
///
/// Used at the gateway boundary, where payloads arrive from clients we do not control.
pub fn validate_inputs(
    diagnostic_type: &DiagnosticType,
    inputs: &BTreeMap<String, f64>,
) -> DiagResult<()> {
    let missing: Vec<String> = diagnostic_type
        .fields
        .iter()
        .filter(|f| !inputs.contains_key(f.name))
        .map(|f| f.name.to_string())
        .collect();
    let unexpected: Vec<String> = inputs
        .keys()
        .filter(|name| diagnostic_type.field(name).is_none())
        .cloned()
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(DiagError::FieldMismatch {
            diagnostic_type: diagnostic_type.value.to_string(),
            missing,
            unexpected,
        });
    }

    if let Some((name, value)) = inputs.iter().find(|(_, v)| !v.is_finite()) {
        return Err(DiagError::InvalidNumber {
            field: name.clone(),
            raw: value.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = DIAGNOSTICS.iter().map(|d| d.value).collect();
        assert_eq!(keys.len(), DIAGNOSTICS.len());
    }

    #[test]
    fn field_names_are_unique_within_each_type() {
        for d in DIAGNOSTICS {
            let names: HashSet<_> = d.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), d.fields.len(), "duplicate field in {}", d.value);
            assert!(!d.fields.is_empty(), "{} has no fields", d.value);
        }
    }

    #[test]
    fn menu_order_and_initial_type() {
        let keys: Vec<_> = diagnostic_types().iter().map(|d| d.value).collect();
        assert_eq!(
            keys,
            ["low_suction", "high_head", "high_superheat", "low_subcooling"]
        );
        assert_eq!(default_type().value, "low_suction");
    }

    #[test]
    fn find_returns_fields_in_declared_order() {
        let d = find("low_suction").unwrap();
        let fields: Vec<_> = d.fields.iter().map(|f| (f.name, f.default)).collect();
        assert_eq!(
            fields,
            [
                ("suction_pressure", 38.0),
                ("superheat", 25.0),
                ("compressor_temp", 230.0)
            ]
        );
        assert_eq!(
            find("high_head").unwrap().field("head_pressure").unwrap().label,
            "Head (Discharge) Pressure (psi)"
        );
        assert!(find("no_such_type").is_none());
    }

    #[test]
    fn validate_inputs_accepts_exact_field_set() {
        let d = find("high_head").unwrap();
        let inputs = BTreeMap::from([
            ("head_pressure".to_string(), 300.0),
            ("ambient_temp".to_string(), 95.5),
        ]);
        assert!(validate_inputs(d, &inputs).is_ok());
    }

    #[test]
    fn validate_inputs_reports_missing_and_unexpected() {
        let d = find("high_head").unwrap();
        let inputs = BTreeMap::from([
            ("head_pressure".to_string(), 300.0),
            ("superheat".to_string(), 10.0),
        ]);
        match validate_inputs(d, &inputs).unwrap_err() {
            DiagError::FieldMismatch {
                missing,
                unexpected,
                ..
            } => {
                assert_eq!(missing, vec!["ambient_temp".to_string()]);
                assert_eq!(unexpected, vec!["superheat".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_inputs_rejects_non_finite() {
        let d = find("low_subcooling").unwrap();
        let inputs = BTreeMap::from([("subcooling".to_string(), f64::NAN)]);
        assert!(matches!(
            validate_inputs(d, &inputs),
            Err(DiagError::InvalidNumber { .. })
        ));
    }
}
