use crate::error::{EditorError, EditorResult};
use crate::record::examination::{ExaminationChange, ExaminationSlice, VitalSigns};

const TEMPERATURE_RANGE: (f64, f64) = (25.0, 45.0);
const WEIGHT_RANGE: (f64, f64) = (0.2, 500.0);
const HEIGHT_RANGE: (f64, f64) = (20.0, 280.0);

pub struct ExaminationEditor<'a> {
    slice: &'a ExaminationSlice,
}

impl<'a> ExaminationEditor<'a> {
    pub fn new(slice: &'a ExaminationSlice) -> Self {
        Self { slice }
    }

    /// Replaces the vital signs whole. BMI is recomputed; any supplied value is ignored.
    pub fn set_vital_signs(&self, vitals: VitalSigns) -> EditorResult<ExaminationChange> {
        check_vitals(&vitals)?;
        Ok(ExaminationChange::VitalSigns(Some(vitals.with_derived_bmi())))
    }

    /// Edits some vital signs, keeping every field `edit` does not touch.
    pub fn update_vital_signs(
        &self,
        edit: impl FnOnce(&mut VitalSigns),
    ) -> EditorResult<ExaminationChange> {
        let mut vitals = self.slice.vital_signs.clone().unwrap_or_default();
        edit(&mut vitals);
        self.set_vital_signs(vitals)
    }

    pub fn set_weight(&self, kg: Option<f64>) -> EditorResult<ExaminationChange> {
        self.update_vital_signs(|vitals| vitals.weight = kg)
    }

    pub fn set_height(&self, cm: Option<f64>) -> EditorResult<ExaminationChange> {
        self.update_vital_signs(|vitals| vitals.height = cm)
    }

    pub fn clear_vital_signs(&self) -> ExaminationChange {
        ExaminationChange::VitalSigns(None)
    }

    pub fn set_general(&self, text: impl Into<String>) -> ExaminationChange {
        ExaminationChange::General(text.into())
    }

    pub fn set_systemic(&self, text: impl Into<String>) -> ExaminationChange {
        ExaminationChange::Systemic(text.into())
    }

    pub fn set_neurological(&self, text: impl Into<String>) -> ExaminationChange {
        ExaminationChange::Neurological(text.into())
    }
}

fn check_range(field: &'static str, value: Option<f64>, (low, high): (f64, f64)) -> EditorResult<()> {
    match value {
        Some(v) if !(low..=high).contains(&v) => Err(EditorError::OutOfRange { field, value: v }),
        _ => Ok(()),
    }
}

fn check_vitals(vitals: &VitalSigns) -> EditorResult<()> {
    check_range("temperature", vitals.temperature, TEMPERATURE_RANGE)?;
    check_range("weight", vitals.weight, WEIGHT_RANGE)?;
    check_range("height", vitals.height, HEIGHT_RANGE)?;
    if let Some(spo2) = vitals.oxygen_saturation.filter(|v| *v > 100) {
        return Err(EditorError::OutOfRange {
            field: "oxygenSaturation",
            value: f64::from(spo2),
        });
    }
    if let Some(bp) = vitals.blood_pressure.filter(|bp| bp.diastolic > bp.systolic) {
        return Err(EditorError::OutOfRange {
            field: "bloodPressure.diastolic",
            value: f64::from(bp.diastolic),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::examination::BloodPressure;

    #[test]
    fn set_vital_signs_derives_bmi() {
        let slice = ExaminationSlice::default();
        let change = ExaminationEditor::new(&slice)
            .set_vital_signs(VitalSigns {
                weight: Some(70.0),
                height: Some(175.0),
                bmi: Some(10.0),
                ..VitalSigns::default()
            })
            .unwrap();
        let vitals = match change {
            ExaminationChange::VitalSigns(Some(vitals)) => vitals,
            other => panic!("unexpected change: {other:?}"),
        };
        assert_eq!(vitals.bmi, Some(22.9));
    }

    #[test]
    fn single_field_update_spreads_prior_values() {
        let slice = ExaminationSlice {
            vital_signs: Some(VitalSigns {
                temperature: Some(37.0),
                heart_rate: Some(80),
                height: Some(160.0),
                ..VitalSigns::default()
            }),
            ..ExaminationSlice::default()
        };
        let next = slice
            .clone()
            .with_change(ExaminationEditor::new(&slice).set_weight(Some(64.0)).unwrap());

        let vitals = next.vital_signs.unwrap();
        assert_eq!(vitals.temperature, Some(37.0));
        assert_eq!(vitals.heart_rate, Some(80));
        assert_eq!(vitals.weight, Some(64.0));
        assert_eq!(vitals.bmi, Some(25.0));
    }

    #[test]
    fn implausible_values_are_rejected() {
        let slice = ExaminationSlice::default();
        let editor = ExaminationEditor::new(&slice);

        assert!(matches!(
            editor.update_vital_signs(|v| v.temperature = Some(52.0)),
            Err(EditorError::OutOfRange { field: "temperature", .. })
        ));
        assert!(matches!(
            editor.update_vital_signs(|v| v.oxygen_saturation = Some(101)),
            Err(EditorError::OutOfRange { field: "oxygenSaturation", .. })
        ));
        assert!(matches!(
            editor.update_vital_signs(|v| {
                v.blood_pressure = Some(BloodPressure {
                    systolic: 80,
                    diastolic: 120,
                })
            }),
            Err(EditorError::OutOfRange { .. })
        ));
        assert!(matches!(
            editor.set_height(Some(f64::NAN)),
            Err(EditorError::OutOfRange { field: "height", .. })
        ));
    }
}
