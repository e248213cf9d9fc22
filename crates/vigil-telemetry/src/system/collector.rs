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

//! Node CPU and memory collector.
//!
//! Unlike the back-pressure collector, this one has no dedicated serializer:
//! its whole payload is a fixed tuple of scalars, so it emits through the
//! generic fixed-arity record path against its declared schema.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use sysinfo::System;
use vigil_core::telemetry::{
    schema, CollectorGate, FieldKind, FieldSpec, FieldValue, MetricCollector, MetricQueue,
    TopicSchema,
};

/// Topic label for node resource records.
pub const TOPIC: &str = "node_resources";

/// Schema for node resource records.
pub const SCHEMA: TopicSchema = TopicSchema {
    topic: TOPIC,
    fields: &[
        FieldSpec {
            name: "node_cpu_utilization",
            kind: FieldKind::Float,
        },
        FieldSpec {
            name: "node_memory_total_bytes",
            kind: FieldKind::UInt,
        },
        FieldSpec {
            name: "node_memory_used_bytes",
            kind: FieldKind::UInt,
        },
    ],
};

/// Samples whole-node CPU utilization and memory occupancy via `sysinfo`.
#[derive(Debug)]
pub struct NodeResourcesCollector {
    gate: Arc<dyn CollectorGate>,
    queue: MetricQueue,
    system: Mutex<System>,
}

impl NodeResourcesCollector {
    /// Stable collector name; also the gate key.
    pub const NAME: &'static str = "node_resources";

    /// Creates a collector gated by `gate`, publishing onto `queue`.
    pub fn new(gate: Arc<dyn CollectorGate>, queue: MetricQueue) -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self {
            gate,
            queue,
            system: Mutex::new(system),
        }
    }

    fn sample(&self) -> Option<[FieldValue; 3]> {
        let mut system = self.system.lock().ok()?;
        system.refresh_cpu_all();
        system.refresh_memory();
        Some([
            FieldValue::Float(f64::from(system.global_cpu_usage()) / 100.0),
            FieldValue::UInt(system.total_memory()),
            FieldValue::UInt(system.used_memory()),
        ])
    }
}

impl MetricCollector for NodeResourcesCollector {
    fn collector_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(Self::NAME)
    }

    fn topic_schema(&self) -> &'static TopicSchema {
        &SCHEMA
    }

    fn collect(&self, timestamp_ms: u64) {
        if !self.gate.is_collector_enabled(Self::NAME) {
            log::trace!("Collector {} disabled, skipping cycle", Self::NAME);
            return;
        }
        let Some(values) = self.sample() else {
            return;
        };
        match schema::format_record(&SCHEMA, timestamp_ms, &values) {
            Ok(record) => {
                if let Err(e) = self.queue.publish(record) {
                    log::warn!("Collector {}: record dropped: {e}", Self::NAME);
                }
            }
            // Unreachable while `sample` mirrors the schema, but a schema
            // edit that breaks the pairing must be loud.
            Err(e) => log::error!("Collector {}: {e}", Self::NAME),
        }
    }
}
