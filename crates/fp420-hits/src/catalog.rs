// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sensitive-detector catalog: which logical volumes belong to which detector

use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
pub struct SensitiveDetectorCatalog {
    logical_names: AHashMap<String, Vec<String>>,
}

impl SensitiveDetectorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a logical volume to a detector; duplicates are ignored
    pub fn insert(&mut self, detector: impl Into<String>, logical_volume: impl Into<String>) {
        let volumes = self.logical_names.entry(detector.into()).or_default();
        let logical_volume = logical_volume.into();
        if !volumes.contains(&logical_volume) {
            volumes.push(logical_volume);
        }
    }

    pub fn with_volumes<I, S>(mut self, detector: &str, logical_volumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for volume in logical_volumes {
            self.insert(detector, volume);
        }
        self
    }

    /// Logical volumes of a detector in registration order
    pub fn logical_names(&self, detector: &str) -> &[String] {
        self.logical_names
            .get(detector)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
