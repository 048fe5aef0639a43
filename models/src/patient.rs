// models/src/patient.rs

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// Allowed values for the `gender` field.
pub const GENDERS: [&str; 3] = ["male", "female", "other"];

const GENDERS_LABEL: &str = "male, female or other";

/// A patient as submitted on create: the caller-assigned id plus the stored
/// fields. The id is immutable once the record exists.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Patient {
    /// Unique id of the patient, e.g. "P001".
    pub id: String,
    #[serde(flatten)]
    pub record: PatientRecord,
}

/// The stored value of a patient record. The id lives outside as the
/// collection key and is never duplicated inside the value; `bmi` and
/// `verdict` are derived on read and never persisted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    /// Age in years, 0 < age < 120.
    pub age: i32,
    /// One of `GENDERS`, kept as a string and validated.
    pub gender: String,
    /// Height in meters.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

impl PatientRecord {
    /// Checks every field constraint.
    ///
    /// # Errors
    /// Returns a `ValidationError` naming the first field that is empty,
    /// out of range or outside its allowed category set.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.city.is_empty() {
            return Err(ValidationError::EmptyField("city"));
        }
        if self.age <= 0 || self.age >= 120 {
            return Err(ValidationError::OutOfRange {
                field: "age",
                constraint: "0 < age < 120",
            });
        }
        if !GENDERS.contains(&self.gender.as_str()) {
            return Err(ValidationError::InvalidCategory {
                field: "gender",
                value: self.gender.clone(),
                allowed: GENDERS_LABEL,
            });
        }
        if self.height <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "height",
                constraint: "height > 0",
            });
        }
        if self.weight <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "weight",
                constraint: "weight > 0",
            });
        }
        Ok(())
    }

    /// Body-mass index, rounded to the nearest integer but typed as f64.
    /// Rounding happens before the verdict brackets are applied; that order
    /// is load-bearing and must not change.
    pub fn bmi(&self) -> f64 {
        (self.weight / (self.height * self.height)).round()
    }

    /// Weight-status verdict, a pure function of the rounded bmi.
    pub fn verdict(&self) -> Verdict {
        let bmi = self.bmi();
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi <= 25.0 {
            Verdict::Normal
        } else if bmi <= 29.9 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    /// Produces a new record where each field present in `patch` overrides
    /// the existing value and each absent field is retained. The result must
    /// be re-validated as if newly constructed before it is persisted, so a
    /// patch that combines with existing data into an invalid state is
    /// rejected as a whole.
    pub fn merge(&self, patch: &PatientUpdate) -> PatientRecord {
        PatientRecord {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            city: patch.city.clone().unwrap_or_else(|| self.city.clone()),
            age: patch.age.unwrap_or(self.age),
            gender: patch.gender.clone().unwrap_or_else(|| self.gender.clone()),
            height: patch.height.unwrap_or(self.height),
            weight: patch.weight.unwrap_or(self.weight),
        }
    }
}

/// Weight-status brackets over the rounded bmi.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// A partial patch over the mutable fields of a patient. Absent fields leave
/// the stored value untouched; the id is not patchable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

/// The read shape of a patient: id, stored fields and the derived metrics
/// computed at access time so they are never stale.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PatientView {
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: i32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl PatientView {
    pub fn new(id: &str, record: &PatientRecord) -> Self {
        PatientView {
            id: id.to_string(),
            name: record.name.clone(),
            city: record.city.clone(),
            age: record.age,
            gender: record.gender.clone(),
            height: record.height,
            weight: record.weight,
            bmi: record.bmi(),
            verdict: record.verdict(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PatientRecord, PatientUpdate, Verdict};
    use crate::errors::ValidationError;

    fn record(height: f64, weight: f64) -> PatientRecord {
        PatientRecord {
            name: "Asha".to_string(),
            city: "Pune".to_string(),
            age: 30,
            gender: "female".to_string(),
            height,
            weight,
        }
    }

    #[test]
    fn should_compute_rounded_bmi() {
        // 72 / 1.8^2 = 22.22..., rounds to 22.
        assert_eq!(record(1.8, 72.0).bmi(), 22.0);
        // 80 / 1.6^2 = 31.25, rounds to 31.
        assert_eq!(record(1.6, 80.0).bmi(), 31.0);
    }

    #[test]
    fn should_map_bmi_brackets_to_verdicts() {
        assert_eq!(record(1.0, 18.0).verdict(), Verdict::Underweight);
        assert_eq!(record(1.0, 19.0).verdict(), Verdict::Normal);
        assert_eq!(record(1.0, 25.0).verdict(), Verdict::Normal);
        assert_eq!(record(1.0, 26.0).verdict(), Verdict::Overweight);
        assert_eq!(record(1.0, 29.0).verdict(), Verdict::Overweight);
        assert_eq!(record(1.0, 30.0).verdict(), Verdict::Obese);
    }

    #[test]
    fn should_round_before_bracketing() {
        // True bmi 18.4 rounds down to 18, still Underweight.
        assert_eq!(record(1.0, 18.4).verdict(), Verdict::Underweight);
        // True bmi 25.6 rounds up to 26 and lands in Overweight.
        assert_eq!(record(1.0, 25.6).bmi(), 26.0);
        assert_eq!(record(1.0, 25.6).verdict(), Verdict::Overweight);
    }

    #[test]
    fn should_accept_valid_record() {
        assert!(record(1.75, 70.0).validate().is_ok());
    }

    #[test]
    fn should_reject_empty_name_and_city() {
        let mut r = record(1.75, 70.0);
        r.name.clear();
        assert_eq!(r.validate().unwrap_err(), ValidationError::EmptyField("name"));

        let mut r = record(1.75, 70.0);
        r.city.clear();
        assert_eq!(r.validate().unwrap_err(), ValidationError::EmptyField("city"));
    }

    #[test]
    fn should_reject_age_outside_open_range() {
        for age in [0, -3, 120, 200] {
            let mut r = record(1.75, 70.0);
            r.age = age;
            assert!(
                matches!(
                    r.validate().unwrap_err(),
                    ValidationError::OutOfRange { field: "age", .. }
                ),
                "age {} should be rejected",
                age
            );
        }
        let mut r = record(1.75, 70.0);
        r.age = 119;
        assert!(r.validate().is_ok());
    }

    #[test]
    fn should_reject_unknown_gender() {
        let mut r = record(1.75, 70.0);
        r.gender = "x".to_string();
        assert!(matches!(
            r.validate().unwrap_err(),
            ValidationError::InvalidCategory { field: "gender", .. }
        ));
    }

    #[test]
    fn should_reject_nonpositive_height_and_weight() {
        let mut r = record(1.75, 70.0);
        r.height = 0.0;
        assert!(matches!(
            r.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "height", .. }
        ));

        let mut r = record(1.75, 70.0);
        r.weight = -5.0;
        assert!(matches!(
            r.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "weight", .. }
        ));
    }

    #[test]
    fn should_keep_record_unchanged_on_empty_patch() {
        let existing = record(1.75, 70.0);
        let merged = existing.merge(&PatientUpdate::default());
        assert_eq!(merged, existing);
    }

    #[test]
    fn should_override_only_patched_fields() {
        let existing = record(1.75, 70.0);
        let patch = PatientUpdate {
            age: Some(40),
            ..Default::default()
        };
        let merged = existing.merge(&patch);
        assert_eq!(merged.age, 40);
        assert_eq!(
            PatientRecord { age: 30, ..merged },
            existing
        );
    }

    #[test]
    fn should_reject_merge_that_violates_constraints() {
        let existing = record(1.75, 70.0);
        let patch = PatientUpdate {
            age: Some(0),
            ..Default::default()
        };
        let merged = existing.merge(&patch);
        assert!(matches!(
            merged.validate().unwrap_err(),
            ValidationError::OutOfRange { field: "age", .. }
        ));
    }

    #[test]
    fn should_reject_invalid_gender_after_merge() {
        let existing = record(1.75, 70.0);
        let patch = PatientUpdate {
            gender: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            existing.merge(&patch).validate().unwrap_err(),
            ValidationError::InvalidCategory { field: "gender", .. }
        ));
    }

    #[test]
    fn should_deserialize_patch_with_unset_fields() {
        let patch: PatientUpdate = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        assert_eq!(patch.age, Some(40));
        assert_eq!(patch.name, None);
        assert_eq!(patch.height, None);
    }
}
