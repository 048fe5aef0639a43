// models/src/lib.rs

pub mod errors;
pub mod patient;

pub use errors::{RegistryError, RegistryResult, ValidationError, ValidationResult};
pub use patient::{Patient, PatientRecord, PatientUpdate, PatientView, Verdict};
