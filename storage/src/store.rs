// storage/src/store.rs

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use models::errors::{RegistryError, RegistryResult};
use models::patient::{Patient, PatientRecord, PatientUpdate, PatientView};

use crate::sort::{SortField, SortOrder};

/// The whole durable document: patient id mapped to the stored record. The
/// id is the key and is not duplicated inside the value.
pub type Collection = BTreeMap<String, PatientRecord>;

/// Access to the patient collection. Every operation is a single
/// load-mutate-save transaction against the durable document; there is no
/// long-lived in-memory copy between requests.
#[async_trait]
pub trait PatientStore: Send + Sync + 'static {
    /// Returns the full collection as stored, without derived fields.
    async fn view_all(&self) -> RegistryResult<Collection>;

    /// Looks up a single patient and computes its derived fields.
    async fn get(&self, id: &str) -> RegistryResult<PatientView>;

    /// Adds a new patient. Fails with `Conflict` if the id is taken.
    async fn insert(&self, patient: Patient) -> RegistryResult<()>;

    /// Applies a partial patch, re-validates the merged record as a whole
    /// and persists only on success.
    async fn update(&self, id: &str, patch: PatientUpdate) -> RegistryResult<PatientView>;

    /// Removes a patient. Fails with `NotFound` for an unknown id.
    async fn delete(&self, id: &str) -> RegistryResult<()>;

    /// Returns every patient ordered by `field`. The sort is stable, so
    /// ties keep their storage order.
    async fn sorted_view(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> RegistryResult<Vec<PatientView>>;
}

/// A `PatientStore` backed by a single JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes each load-mutate-save sequence within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Seeds an empty document so a fresh deployment starts from `{}`.
    /// `load` itself still fails if the file is absent.
    pub async fn init(&self) -> RegistryResult<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        debug!(path = %self.path.display(), "seeding empty patient document");
        self.save(&Collection::new()).await
    }

    /// Reads and parses the entire durable document.
    pub async fn load(&self) -> RegistryResult<Collection> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            RegistryError::Storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let collection = serde_json::from_str(&raw).map_err(|e| {
            RegistryError::Storage(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(collection)
    }

    /// Writes the entire document, replacing prior contents.
    pub async fn save(&self, collection: &Collection) -> RegistryResult<()> {
        let raw = serde_json::to_string(collection)?;
        fs::write(&self.path, raw).await.map_err(|e| {
            RegistryError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl PatientStore for JsonFileStore {
    async fn view_all(&self) -> RegistryResult<Collection> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, id: &str) -> RegistryResult<PatientView> {
        let _guard = self.lock.lock().await;
        let collection = self.load().await?;
        let record = collection
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(PatientView::new(id, record))
    }

    async fn insert(&self, patient: Patient) -> RegistryResult<()> {
        patient.record.validate()?;
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        if collection.contains_key(&patient.id) {
            return Err(RegistryError::Conflict(patient.id));
        }
        debug!(id = %patient.id, "inserting patient");
        collection.insert(patient.id, patient.record);
        self.save(&collection).await
    }

    async fn update(&self, id: &str, patch: PatientUpdate) -> RegistryResult<PatientView> {
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        let existing = collection
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        // The merged record is validated as a whole, so a patch that only
        // touches one field still cannot leave an invalid composite behind.
        let merged = existing.merge(&patch);
        merged.validate()?;
        debug!(id = %id, "updating patient");
        let view = PatientView::new(id, &merged);
        collection.insert(id.to_string(), merged);
        self.save(&collection).await?;
        Ok(view)
    }

    async fn delete(&self, id: &str) -> RegistryResult<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        if collection.remove(id).is_none() {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        debug!(id = %id, "deleting patient");
        self.save(&collection).await
    }

    async fn sorted_view(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> RegistryResult<Vec<PatientView>> {
        let _guard = self.lock.lock().await;
        let collection = self.load().await?;
        let mut views: Vec<PatientView> = collection
            .iter()
            .map(|(id, record)| PatientView::new(id, record))
            .collect();
        views.sort_by(|a, b| {
            let (ka, kb) = (sort_key(a, field), sort_key(b, field));
            match order {
                SortOrder::Asc => ka.partial_cmp(&kb).unwrap_or(Ordering::Equal),
                SortOrder::Desc => kb.partial_cmp(&ka).unwrap_or(Ordering::Equal),
            }
        });
        Ok(views)
    }
}

fn sort_key(view: &PatientView, field: SortField) -> f64 {
    match field {
        SortField::Height => view.height,
        SortField::Weight => view.weight,
        SortField::Bmi => view.bmi,
    }
}
