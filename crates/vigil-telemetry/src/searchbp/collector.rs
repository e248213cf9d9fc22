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

//! The search back-pressure collector.

use super::serializer::{self, SCHEMA};
use super::snapshot::{BackPressureSource, SnapshotBuilder};
use std::borrow::Cow;
use std::sync::Arc;
use vigil_core::telemetry::{
    schema, CollectorGate, FieldValue, MetricCollector, MetricQueue, TelemetryResult, TopicSchema,
};

/// Collects aggregated search back-pressure statistics once per cycle.
///
/// A cycle is gate → read → serialize → publish, fully synchronous, and
/// re-entered from scratch on the next tick. A disabled gate publishes
/// nothing; an unavailable upstream skips the cycle with a warning and
/// leaves the next tick untouched.
#[derive(Debug)]
pub struct SearchBackPressureCollector {
    gate: Arc<dyn CollectorGate>,
    builder: SnapshotBuilder,
    queue: MetricQueue,
}

impl SearchBackPressureCollector {
    /// Stable collector name; also the gate key.
    pub const NAME: &'static str = "search_back_pressure";

    /// Creates a collector reading from `source`, gated by `gate`, and
    /// publishing onto `queue`.
    pub fn new(
        gate: Arc<dyn CollectorGate>,
        source: Arc<dyn BackPressureSource>,
        queue: MetricQueue,
    ) -> Self {
        Self {
            gate,
            builder: SnapshotBuilder::new(source),
            queue,
        }
    }

    /// Low-level emission path: publishes a record of raw scalar values
    /// through the shared fixed-arity formatting helper.
    ///
    /// The back-pressure topic declares no value fields, so any non-empty
    /// `values` fails with a schema violation and enqueues nothing.
    pub fn save_metric_values(
        &self,
        timestamp_ms: u64,
        values: &[FieldValue],
    ) -> TelemetryResult<()> {
        let record = schema::format_record(&SCHEMA, timestamp_ms, values)?;
        self.queue.publish(record)
    }
}

impl MetricCollector for SearchBackPressureCollector {
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
        let snapshot = match self.builder.build() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Collector {}: skipping cycle: {e}", Self::NAME);
                return;
            }
        };
        let record = serializer::serialize(&snapshot, timestamp_ms);
        if let Err(e) = self.queue.publish(record) {
            log::warn!("Collector {}: record dropped: {e}", Self::NAME);
        }
    }
}
