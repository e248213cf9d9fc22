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

//! # Vigil Telemetry
//!
//! Central telemetry service and the collector family for the vigil node
//! agent. Each collector samples one live subsystem on a fixed cadence and
//! publishes a flattened record onto the shared bounded queue defined in
//! `vigil-core`; a downstream reader drains the queue and ships the records
//! off-node.

pub mod config;
pub mod searchbp;
pub mod service;
pub mod system;

pub use config::{CollectorsConfig, ConfigGate};
pub use service::{CollectorRegistry, TelemetryService};
