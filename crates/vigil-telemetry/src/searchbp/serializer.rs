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

//! Flattening of back-pressure snapshots into the outbound record format.
//!
//! The field names emitted here are a compatibility-critical wire format:
//! downstream analyzers read them by exact name and rely on their order.
//! Names are built by mechanical concatenation of the scope prefix, the
//! tracker segment, and the statistic suffix; nothing here may be renamed
//! or reordered.

use super::snapshot::BackPressureSnapshot;
use super::stats::{ResourceUsage, TaskScopeStats};
use vigil_core::telemetry::{MetricRecord, TopicSchema};

/// Topic label for back-pressure records.
pub const TOPIC: &str = "search_back_pressure";

/// Schema descriptor for the back-pressure topic.
///
/// The body is produced by [`serialize`], not by the generic fixed-arity
/// path, so the schema declares no value fields: raw emissions carry the
/// topic label alone.
pub const SCHEMA: TopicSchema = TopicSchema {
    topic: TOPIC,
    fields: &[],
};

const PREFIX: &str = "searchbp";

fn push_scope(record: &mut MetricRecord, scope: &str, stats: &TaskScopeStats) {
    record.push_field(
        format!("{PREFIX}_{scope}_cancellationCount"),
        stats.cancellation_count,
    );
    record.push_field(
        format!("{PREFIX}_{scope}_limitReachedCount"),
        stats.limit_reached_count,
    );
    for (kind, usage) in stats.resource_usage.iter() {
        let base = format!("{PREFIX}_{scope}_resource_{}", kind.field_segment());
        record.push_field(format!("{base}_cancellationCount"), usage.cancellation_count());
        record.push_field(format!("{base}_currentMax"), usage.current_max());
        match usage {
            ResourceUsage::Heap { rolling_avg, .. } => {
                record.push_field(format!("{base}_rollingAvg"), *rolling_avg);
            }
            ResourceUsage::Tracked { current_avg, .. } => {
                record.push_field(format!("{base}_currentAvg"), *current_avg);
            }
        }
    }
}

/// Flattens one snapshot into its outbound record.
///
/// Emission order: the shard-task scope, the node-task scope, then the
/// operating mode and node id. Within a scope: the two scalar counters,
/// then three fields per tracker in heap, CPU, elapsed-time order.
pub fn serialize(snapshot: &BackPressureSnapshot, timestamp_ms: u64) -> MetricRecord {
    let mut record = MetricRecord::new(TOPIC, timestamp_ms);
    push_scope(&mut record, "shard_stats", &snapshot.shard_task_stats);
    push_scope(&mut record, "task_stats", &snapshot.task_stats);
    record.push_field(format!("{PREFIX}_mode"), snapshot.mode.as_str());
    record.push_field(format!("{PREFIX}_nodeid"), snapshot.node_id.as_str());
    record
}
