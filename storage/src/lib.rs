// storage/src/lib.rs

pub mod sort;
pub mod store;

pub use sort::{SortField, SortOrder};
pub use store::{Collection, JsonFileStore, PatientStore};
