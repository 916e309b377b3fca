//! User location preference and its persistence.
//!
//! The preference is an explicit value handed to fetch operations. Storage
//! sits behind [`LocationStore`] so callers choose where (or whether) it is
//! persisted.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::venue::LatLng;

/// File name used by [`JsonFileLocationStore`] inside its directory.
pub const LOCATION_STORAGE_KEY: &str = "user-location-storage";

/// A chosen search origin with a human-readable city label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngCity {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
}

impl LatLngCity {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, city_name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            city_name: city_name.into(),
        }
    }

    #[must_use]
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

impl Default for LatLngCity {
    /// Central Jakarta.
    fn default() -> Self {
        Self::new(-6.2088, 106.8456, "Jakarta")
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("location store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("location store JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for the location preference.
pub trait LocationStore: Send + Sync {
    /// Returns the saved preference, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be read or
    /// holds malformed data.
    fn load(&self) -> Result<Option<LatLngCity>, StoreError>;

    /// Replaces the saved preference.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage cannot be written.
    fn save(&self, location: &LatLngCity) -> Result<(), StoreError>;
}

/// Loads the saved preference, falling back to [`LatLngCity::default`] when
/// nothing is stored or the store is unreadable.
pub fn load_or_default(store: &dyn LocationStore) -> LatLngCity {
    match store.load() {
        Ok(Some(location)) => location,
        Ok(None) => LatLngCity::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load location preference; using default");
            LatLngCity::default()
        }
    }
}

/// Stores the preference as pretty JSON in `<dir>/user-location-storage.json`.
#[derive(Debug, Clone)]
pub struct JsonFileLocationStore {
    path: PathBuf,
}

impl JsonFileLocationStore {
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{LOCATION_STORAGE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LocationStore for JsonFileLocationStore {
    fn load(&self) -> Result<Option<LatLngCity>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let location = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(location))
    }

    fn save(&self, location: &LatLngCity) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let json = serde_json::to_string_pretty(location).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), city = %location.city_name, "saved location preference");
        Ok(())
    }
}

/// Process-local store with no persistence.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
    slot: Mutex<Option<LatLngCity>>,
}

impl MemoryLocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryLocationStore {
    fn load(&self) -> Result<Option<LatLngCity>, StoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, location: &LatLngCity) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(location.clone());
        Ok(())
    }
}
