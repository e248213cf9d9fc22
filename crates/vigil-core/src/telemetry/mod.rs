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

//! Provides the foundational traits and data structures for node telemetry.
//!
//! This module defines the "common language" for all collectors: the outbound
//! record format, the typed per-topic schema descriptors, the bounded queue
//! the records travel on, and the contracts a collector and its enablement
//! gate must satisfy. This crate defines the abstract "what" of telemetry,
//! while `vigil-telemetry` provides the central service and the concrete
//! collectors built on these contracts.

pub mod collector;
pub mod error;
pub mod queue;
pub mod record;
pub mod schema;

pub use self::collector::{CollectorGate, MetricCollector};
pub use self::error::{TelemetryError, TelemetryResult};
pub use self::queue::MetricQueue;
pub use self::record::MetricRecord;
pub use self::schema::{FieldKind, FieldSpec, FieldValue, TopicSchema};
