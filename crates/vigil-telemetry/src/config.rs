// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Collector enablement configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use vigil_core::telemetry::CollectorGate;

/// On/off configuration for the collector family.
///
/// Collectors are keyed by their stable name; a name without an explicit
/// override falls back to `default_enabled`. Overrides are operator-supplied
/// JSON and can be swapped at runtime through [`ConfigGate::update`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorsConfig {
    /// Whether collectors without an explicit override run.
    pub default_enabled: bool,
    /// Per-collector overrides keyed by collector name.
    #[serde(default)]
    pub overrides: HashMap<String, bool>,
}

impl CollectorsConfig {
    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Sets or replaces the override for one collector.
    pub fn set_override(&mut self, collector_name: impl Into<String>, enabled: bool) {
        self.overrides.insert(collector_name.into(), enabled);
    }

    /// Whether the named collector is enabled under this configuration.
    pub fn is_enabled(&self, collector_name: &str) -> bool {
        self.overrides
            .get(collector_name)
            .copied()
            .unwrap_or(self.default_enabled)
    }
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            default_enabled: true,
            overrides: HashMap::new(),
        }
    }
}

/// A [`CollectorGate`] backed by a [`CollectorsConfig`].
#[derive(Debug)]
pub struct ConfigGate {
    config: RwLock<CollectorsConfig>,
}

impl ConfigGate {
    /// Creates a gate over the given configuration.
    pub fn new(config: CollectorsConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replaces the active configuration (operator override reload).
    pub fn update(&self, config: CollectorsConfig) {
        if let Ok(mut guard) = self.config.write() {
            *guard = config;
        }
    }

    /// A copy of the active configuration.
    pub fn current(&self) -> CollectorsConfig {
        self.config
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CollectorGate for ConfigGate {
    fn is_collector_enabled(&self, collector_name: &str) -> bool {
        match self.config.read() {
            Ok(config) => config.is_enabled(collector_name),
            // Poisoned lock: fail closed.
            Err(_) => false,
        }
    }
}
