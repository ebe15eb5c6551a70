// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event replay
//!
//! Feeds recorded transport steps through the detector the way the engine
//! would: begin-of-event, initialize, every step, end-of-event.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use fp420_config::Fp420Config;
use fp420_hits::{
    BeginOfEvent, EndOfEvent, Fp420SensitiveDetector, HitsCollectionsOfEvent, Observer,
    SensitiveDetector, SensitiveDetectorCatalog, SimHit, SimStep, TrackingSlave,
};

/// Recorded events
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplayInput {
    /// Logical volumes bound to the detector
    #[serde(default)]
    pub logical_volumes: Vec<String>,
    pub events: Vec<ReplayEvent>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplayEvent {
    pub event_id: i32,
    #[serde(default)]
    pub steps: Vec<SimStep>,
}

/// Replay output for one event
#[derive(Debug, Clone, Serialize)]
pub struct EventHits {
    pub event_id: i32,
    pub steps: usize,
    pub hits: usize,
    pub dropped: usize,
    pub persisted: Vec<SimHit>,
}

pub fn read_input(path: &Path) -> Result<ReplayInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read replay input {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse replay input {}", path.display()))
}

pub struct ReplayRunner {
    detector: Fp420SensitiveDetector,
    registry: HitsCollectionsOfEvent,
}

impl ReplayRunner {
    pub fn new(config: &Fp420Config, logical_volumes: &[String]) -> Self {
        let name = config.sensitive_detector.name.as_str();
        let catalog = SensitiveDetectorCatalog::new().with_volumes(name, logical_volumes.iter().cloned());
        Self {
            detector: Fp420SensitiveDetector::new(name, &catalog, &config.sensitive_detector),
            registry: HitsCollectionsOfEvent::new(),
        }
    }

    pub fn detector(&self) -> &Fp420SensitiveDetector {
        &self.detector
    }

    pub fn run_event(&mut self, event: &ReplayEvent) -> EventHits {
        self.registry.clear();
        self.detector.update(&BeginOfEvent {
            event_id: event.event_id,
        });
        self.detector.initialize(&mut self.registry);

        for step in &event.steps {
            self.detector.process_hits(Some(step));
        }

        self.detector.end_of_event();
        self.detector.update(&EndOfEvent {
            event_id: event.event_id,
        });

        let summary = self.detector.last_summary();
        let mut persisted = Vec::new();
        self.detector.fill_hits(&mut persisted, self.detector.slave().name());

        info!(
            target: "fp420_replay",
            event = event.event_id,
            steps = event.steps.len(),
            hits = summary.hits,
            persisted = summary.persisted,
            "Event replayed"
        );

        EventHits {
            event_id: event.event_id,
            steps: event.steps.len(),
            hits: summary.hits,
            dropped: summary.dropped,
            persisted,
        }
    }

    pub fn run(&mut self, input: &ReplayInput) -> Vec<EventHits> {
        input.events.iter().map(|event| self.run_event(event)).collect()
    }
}

/// One JSON document per event, newline separated
pub fn write_json_lines<W: Write>(results: &[EventHits], mut out: W) -> Result<()> {
    for result in results {
        serde_json::to_writer(&mut out, result).context("Failed to serialize event hits")?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
