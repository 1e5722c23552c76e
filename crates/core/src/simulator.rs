//! Refrigeration rack simulator.
//!
//! Produces a plausible rack state with every reading inside its normal operating range for
//! R-448A, then applies the symptoms of a chosen fault. Used to seed the form with realistic
//! readings for training and demos; it makes no diagnosis of its own.

use crate::form::FormController;
use crate::{DiagError, DiagResult};
use rand::Rng;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const SUCTION_PRESSURE_PSIG: RangeInclusive<f64> = 35.0..=45.0;
pub const DISCHARGE_PRESSURE_PSIG: RangeInclusive<f64> = 180.0..=220.0;
pub const DISCHARGE_TEMP_F: RangeInclusive<f64> = 160.0..=200.0;
pub const SUPERHEAT_F: RangeInclusive<f64> = 8.0..=15.0;
pub const SUBCOOLING_F: RangeInclusive<f64> = 8.0..=15.0;
pub const COMPRESSOR_AMPS: RangeInclusive<f64> = 10.0..=15.0;
pub const CONDENSER_FAN_SPEED_PCT: RangeInclusive<u8> = 60..=100;
pub const LIQUID_LINE_TEMP_F: RangeInclusive<f64> = 90.0..=110.0;

/// Fault conditions the simulator can inject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    LowCharge,
    HighDischargeTemp,
    LowSuctionPressure,
}

impl Fault {
    pub const ALL: [Fault; 3] = [
        Fault::LowCharge,
        Fault::HighDischargeTemp,
        Fault::LowSuctionPressure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Fault::LowCharge => "low_charge",
            Fault::HighDischargeTemp => "high_discharge_temp",
            Fault::LowSuctionPressure => "low_suction_pressure",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Fault::LowCharge => "Low Refrigerant Charge",
            Fault::HighDischargeTemp => "High Discharge Temperature",
            Fault::LowSuctionPressure => "Low Suction Pressure",
        }
    }
}

impl FromStr for Fault {
    type Err = DiagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fault::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| DiagError::UnknownFault(s.to_string()))
    }
}

/// Snapshot of the rack's sensors and active alarms.
#[derive(Clone, Debug, PartialEq)]
pub struct RackState {
    pub suction_pressure_psig: f64,
    pub discharge_pressure_psig: f64,
    pub discharge_temp_f: f64,
    pub superheat_f: f64,
    pub subcooling_f: f64,
    pub compressor_amps: f64,
    pub condenser_fan_speed_pct: u8,
    pub liquid_line_temp_f: f64,
    pub alarms: Vec<String>,
}

impl RackState {
    /// A state with every reading drawn uniformly from its normal range and no alarms.
    pub fn normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            suction_pressure_psig: rng.gen_range(SUCTION_PRESSURE_PSIG),
            discharge_pressure_psig: rng.gen_range(DISCHARGE_PRESSURE_PSIG),
            discharge_temp_f: rng.gen_range(DISCHARGE_TEMP_F),
            superheat_f: rng.gen_range(SUPERHEAT_F),
            subcooling_f: rng.gen_range(SUBCOOLING_F),
            compressor_amps: rng.gen_range(COMPRESSOR_AMPS),
            condenser_fan_speed_pct: rng.gen_range(CONDENSER_FAN_SPEED_PCT),
            liquid_line_temp_f: rng.gen_range(LIQUID_LINE_TEMP_F),
            alarms: Vec::new(),
        }
    }

    /// Apply the symptoms of `fault` on top of the current readings.
    pub fn apply_fault(&mut self, fault: Fault) {
        match fault {
            Fault::LowCharge => {
                self.suction_pressure_psig *= 0.7;
                self.superheat_f *= 1.5;
                self.subcooling_f *= 0.5;
                self.discharge_temp_f *= 1.2;
                self.alarms.push("low_suction_pressure".into());
            }
            Fault::HighDischargeTemp => {
                self.discharge_temp_f = 250.0;
                self.discharge_pressure_psig *= 1.3;
                self.condenser_fan_speed_pct = 30;
                self.alarms.push("high_discharge_temp".into());
            }
            Fault::LowSuctionPressure => {
                self.suction_pressure_psig = 25.0;
                self.superheat_f = 25.0;
                self.compressor_amps *= 0.8;
                self.alarms.push("low_suction_pressure".into());
            }
        }
    }

    /// The reading that feeds a form field, if the rack measures it.
    ///
    /// Compressor temperature is read from the discharge line and head pressure is the discharge
    /// pressure. Ambient temperature is not measured by the rack.
    pub fn reading_for(&self, field: &str) -> Option<f64> {
        match field {
            "suction_pressure" => Some(self.suction_pressure_psig),
            "superheat" => Some(self.superheat_f),
            "compressor_temp" => Some(self.discharge_temp_f),
            "head_pressure" => Some(self.discharge_pressure_psig),
            "subcooling" => Some(self.subcooling_f),
            _ => None,
        }
    }

    /// Named readings in display order.
    pub fn readings(&self) -> [(&'static str, f64); 8] {
        [
            ("suction_pressure_psig", self.suction_pressure_psig),
            ("discharge_pressure_psig", self.discharge_pressure_psig),
            ("discharge_temp_f", self.discharge_temp_f),
            ("superheat_f", self.superheat_f),
            ("subcooling_f", self.subcooling_f),
            ("compressor_amps", self.compressor_amps),
            ("condenser_fan_speed_pct", f64::from(self.condenser_fan_speed_pct)),
            ("liquid_line_temp_f", self.liquid_line_temp_f),
        ]
    }
}

/// A fresh normal state with `fault` applied.
pub fn simulate<R: Rng + ?Sized>(rng: &mut R, fault: Fault) -> RackState {
    let mut state = RackState::normal(rng);
    state.apply_fault(fault);
    tracing::debug!(fault = fault.as_str(), "simulated rack fault");
    state
}

/// Enter the rack's readings into the selected type's fields.
///
/// Readings are rounded to one decimal place. Fields the rack does not measure keep whatever the
/// form already shows. Returns the names of the fields that were set.
pub fn seed_form(form: &mut FormController, state: &RackState) -> DiagResult<Vec<&'static str>> {
    let mut seeded = Vec::new();
    for field in form.fields() {
        if let Some(reading) = state.reading_for(field.name) {
            form.set_field_number(field.name, (reading * 10.0).round() / 10.0)?;
            seeded.push(field.name);
        }
    }
    Ok(seeded)
}
