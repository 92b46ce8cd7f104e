//! Examination slice: vital signs and exam notes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExaminationSlice {
    pub vital_signs: Option<VitalSigns>,
    pub general: String,
    pub systemic: String,
    pub neurological: String,
}

/// A set of vital-sign measurements. Any field may still be missing while drafting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VitalSigns {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub blood_pressure: Option<BloodPressure>,
    /// Beats per minute.
    pub heart_rate: Option<u16>,
    /// Breaths per minute.
    pub respiratory_rate: Option<u16>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Derived from weight and height; never entered directly.
    pub bmi: Option<f64>,
    /// Percent.
    pub oxygen_saturation: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl VitalSigns {
    /// True when nothing has been measured.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.blood_pressure.is_none()
            && self.heart_rate.is_none()
            && self.respiratory_rate.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.oxygen_saturation.is_none()
    }

    /// Returns a copy with `bmi` recomputed from weight and height.
    pub fn with_derived_bmi(self) -> Self {
        let bmi = match (self.weight, self.height) {
            (Some(kg), Some(cm)) => body_mass_index(kg, cm),
            _ => None,
        };
        Self { bmi, ..self }
    }
}

/// kg / m², rounded to one decimal place.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return None;
    }
    let metres = height_cm / 100.0;
    let bmi = weight_kg / (metres * metres);
    Some((bmi * 10.0).round() / 10.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ExaminationChange {
    /// `None` clears the recorded vitals.
    VitalSigns(Option<VitalSigns>),
    General(String),
    Systemic(String),
    Neurological(String),
}

impl ExaminationChange {
    pub const FIELDS: &'static [&'static str] =
        &["vitalSigns", "general", "systemic", "neurological"];
}

impl ExaminationSlice {
    pub fn with_change(self, change: ExaminationChange) -> Self {
        match change {
            ExaminationChange::VitalSigns(vital_signs) => Self {
                vital_signs,
                ..self
            },
            ExaminationChange::General(general) => Self { general, ..self },
            ExaminationChange::Systemic(systemic) => Self { systemic, ..self },
            ExaminationChange::Neurological(neurological) => Self {
                neurological,
                ..self
            },
        }
    }

    /// True if at least one vital sign has been recorded.
    pub fn has_vital_signs(&self) -> bool {
        self.vital_signs
            .as_ref()
            .is_some_and(|vitals| !vitals.is_empty())
    }
}
