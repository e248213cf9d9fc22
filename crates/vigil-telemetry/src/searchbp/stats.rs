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

//! Data model for aggregated search back-pressure statistics.

use std::collections::HashMap;
use std::fmt::Display;
use vigil_core::telemetry::{TelemetryError, TelemetryResult};

/// The closed set of resource trackers the admission-control subsystem
/// maintains per task scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    /// Heap memory consumed by in-flight tasks.
    HeapUsage,
    /// CPU time consumed by in-flight tasks.
    CpuUsage,
    /// Wall-clock time consumed by in-flight tasks.
    ElapsedTimeUsage,
}

impl TrackerKind {
    /// Every tracker kind, in wire-format emission order.
    pub const ALL: [TrackerKind; 3] = [
        TrackerKind::HeapUsage,
        TrackerKind::CpuUsage,
        TrackerKind::ElapsedTimeUsage,
    ];

    /// The identifier the upstream subsystem keys its tracker stats by.
    pub fn upstream_id(&self) -> &'static str {
        match self {
            TrackerKind::HeapUsage => "HEAP_USAGE",
            TrackerKind::CpuUsage => "CPU_USAGE",
            TrackerKind::ElapsedTimeUsage => "ELAPSED_TIME_USAGE",
        }
    }

    /// The name segment used when building record field names.
    ///
    /// `elaspedtime` is a historical misspelling that downstream analyzers
    /// match on; it must not be corrected.
    pub fn field_segment(&self) -> &'static str {
        match self {
            TrackerKind::HeapUsage => "heap_usage",
            TrackerKind::CpuUsage => "cpu_usage",
            TrackerKind::ElapsedTimeUsage => "elaspedtime_usage",
        }
    }
}

impl Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.upstream_id())
    }
}

/// Aggregated usage statistics for one resource tracker.
///
/// Which average a tracker maintains depends on how the subsystem samples
/// it: the heap tracker smooths across sampling windows into a rolling
/// average, while the CPU and elapsed-time trackers average within the
/// current window. The variant carries exactly the statistics its tracker
/// maintains, so a serializer emits the right shape without consulting a
/// flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceUsage {
    /// A tracker maintaining a smoothed, cross-window rolling average.
    Heap {
        /// Cumulative cancellations attributed to this resource.
        cancellation_count: u64,
        /// Peak observed value in the current sampling window.
        current_max: f64,
        /// Smoothed mean maintained incrementally across windows.
        rolling_avg: f64,
    },
    /// A tracker averaging within the current sampling window.
    Tracked {
        /// Cumulative cancellations attributed to this resource.
        cancellation_count: u64,
        /// Peak observed value in the current sampling window.
        current_max: f64,
        /// Arithmetic mean over the current window.
        current_avg: f64,
    },
}

impl ResourceUsage {
    /// Cumulative cancellations attributed to this resource.
    pub fn cancellation_count(&self) -> u64 {
        match self {
            ResourceUsage::Heap {
                cancellation_count, ..
            }
            | ResourceUsage::Tracked {
                cancellation_count, ..
            } => *cancellation_count,
        }
    }

    /// Peak observed value in the current sampling window.
    pub fn current_max(&self) -> f64 {
        match self {
            ResourceUsage::Heap { current_max, .. }
            | ResourceUsage::Tracked { current_max, .. } => *current_max,
        }
    }
}

/// Exactly one [`ResourceUsage`] per [`TrackerKind`].
///
/// The admission-control subsystem always maintains all three trackers; a
/// holder missing one is reporting inconsistent state, so construction from
/// an upstream map fails rather than defaulting the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUsageSet {
    heap: ResourceUsage,
    cpu: ResourceUsage,
    elapsed_time: ResourceUsage,
}

impl TrackerUsageSet {
    /// Creates a set from one usage value per tracker.
    pub fn new(heap: ResourceUsage, cpu: ResourceUsage, elapsed_time: ResourceUsage) -> Self {
        Self {
            heap,
            cpu,
            elapsed_time,
        }
    }

    /// Projects an upstream tracker map into a set.
    pub fn from_upstream(map: &HashMap<TrackerKind, ResourceUsage>) -> TelemetryResult<Self> {
        let pick = |kind: TrackerKind| {
            map.get(&kind).copied().ok_or_else(|| {
                TelemetryError::UpstreamUnavailable(format!(
                    "tracker {} missing from admission-control stats",
                    kind.upstream_id()
                ))
            })
        };
        Ok(Self {
            heap: pick(TrackerKind::HeapUsage)?,
            cpu: pick(TrackerKind::CpuUsage)?,
            elapsed_time: pick(TrackerKind::ElapsedTimeUsage)?,
        })
    }

    /// The usage statistics for one tracker.
    pub fn get(&self, kind: TrackerKind) -> &ResourceUsage {
        match kind {
            TrackerKind::HeapUsage => &self.heap,
            TrackerKind::CpuUsage => &self.cpu,
            TrackerKind::ElapsedTimeUsage => &self.elapsed_time,
        }
    }

    /// Iterates the trackers in wire-format emission order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackerKind, &ResourceUsage)> {
        TrackerKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}

/// Aggregated counters for one task scope (node-wide tasks or shard tasks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskScopeStats {
    /// Tasks cancelled in this scope.
    pub cancellation_count: u64,
    /// Times this scope hit a configured limit.
    pub limit_reached_count: u64,
    /// Per-tracker usage statistics.
    pub resource_usage: TrackerUsageSet,
}
