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

//! Point-in-time snapshots of the admission-control state.

use super::stats::{ResourceUsage, TaskScopeStats, TrackerKind, TrackerUsageSet};
use std::collections::HashMap;
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;
use vigil_core::telemetry::{TelemetryError, TelemetryResult};

/// The admission-control subsystem's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPressureMode {
    /// Admission control is off.
    Disabled,
    /// Threshold breaches are recorded but tasks are not cancelled.
    MonitorOnly,
    /// Threshold breaches cancel or limit tasks.
    Enforced,
}

impl BackPressureMode {
    /// The stable label emitted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackPressureMode::Disabled => "DISABLED",
            BackPressureMode::MonitorOnly => "MONITOR_ONLY",
            BackPressureMode::Enforced => "ENFORCED",
        }
    }
}

impl FromStr for BackPressureMode {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISABLED" => Ok(BackPressureMode::Disabled),
            "MONITOR_ONLY" => Ok(BackPressureMode::MonitorOnly),
            "ENFORCED" => Ok(BackPressureMode::Enforced),
            other => Err(TelemetryError::UpstreamUnavailable(format!(
                "unknown admission-control mode `{other}`"
            ))),
        }
    }
}

/// Raw per-scope counters as read from the admission-control subsystem,
/// before projection into [`TaskScopeStats`].
#[derive(Debug, Clone)]
pub struct RawScopeStats {
    /// Tasks cancelled in this scope.
    pub cancellation_count: u64,
    /// Times this scope hit a configured limit.
    pub limit_reached_count: u64,
    /// Tracker statistics keyed the way the subsystem holds them.
    pub resource_usage: HashMap<TrackerKind, ResourceUsage>,
}

/// One raw, point-in-time read of the admission-control state.
#[derive(Debug, Clone)]
pub struct BackPressureStateView {
    /// Identifier of the host node.
    pub node_id: String,
    /// Current operating mode.
    pub mode: BackPressureMode,
    /// Stats holder for shard-level tasks.
    pub shard_task: RawScopeStats,
    /// Stats holder for node-wide tasks.
    pub task: RawScopeStats,
}

/// Read access to the live admission-control subsystem.
///
/// `read` returns the current state, or fails when the subsystem is
/// unreachable or still initializing. That failure is per-cycle and
/// recoverable; the reader must not retry synchronously, since the next
/// scheduled tick reads again.
pub trait BackPressureSource: Send + Sync + Debug {
    /// Takes one point-in-time read of the subsystem state.
    fn read(&self) -> TelemetryResult<BackPressureStateView>;
}

/// An immutable snapshot of the admission-control state, produced once per
/// collection cycle and consumed once by the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackPressureSnapshot {
    /// Identifier of the host node.
    pub node_id: String,
    /// Operating mode at read time.
    pub mode: BackPressureMode,
    /// Aggregates for shard-level tasks.
    pub shard_task_stats: TaskScopeStats,
    /// Aggregates for node-wide tasks.
    pub task_stats: TaskScopeStats,
}

/// Builds snapshots from a [`BackPressureSource`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    source: Arc<dyn BackPressureSource>,
}

impl SnapshotBuilder {
    /// Creates a builder reading from the given source.
    pub fn new(source: Arc<dyn BackPressureSource>) -> Self {
        Self { source }
    }

    /// Takes one read of the subsystem and projects it into a snapshot.
    ///
    /// Fails when the subsystem is unreachable or a tracker is missing from
    /// either holder. No side effects beyond the read.
    pub fn build(&self) -> TelemetryResult<BackPressureSnapshot> {
        let view = self.source.read()?;
        Ok(BackPressureSnapshot {
            shard_task_stats: Self::project(&view.shard_task)?,
            task_stats: Self::project(&view.task)?,
            node_id: view.node_id,
            mode: view.mode,
        })
    }

    fn project(raw: &RawScopeStats) -> TelemetryResult<TaskScopeStats> {
        Ok(TaskScopeStats {
            cancellation_count: raw.cancellation_count,
            limit_reached_count: raw.limit_reached_count,
            resource_usage: TrackerUsageSet::from_upstream(&raw.resource_usage)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedSource(BackPressureStateView);

    impl BackPressureSource for FixedSource {
        fn read(&self) -> TelemetryResult<BackPressureStateView> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug)]
    struct OfflineSource;

    impl BackPressureSource for OfflineSource {
        fn read(&self) -> TelemetryResult<BackPressureStateView> {
            Err(TelemetryError::UpstreamUnavailable(
                "admission control not started".to_string(),
            ))
        }
    }

    fn full_tracker_map() -> HashMap<TrackerKind, ResourceUsage> {
        let mut map = HashMap::new();
        map.insert(
            TrackerKind::HeapUsage,
            ResourceUsage::Heap {
                cancellation_count: 1,
                current_max: 0.75,
                rolling_avg: 0.5,
            },
        );
        map.insert(
            TrackerKind::CpuUsage,
            ResourceUsage::Tracked {
                cancellation_count: 2,
                current_max: 0.9,
                current_avg: 0.4,
            },
        );
        map.insert(
            TrackerKind::ElapsedTimeUsage,
            ResourceUsage::Tracked {
                cancellation_count: 3,
                current_max: 1200.0,
                current_avg: 300.0,
            },
        );
        map
    }

    fn view() -> BackPressureStateView {
        BackPressureStateView {
            node_id: "node-1".to_string(),
            mode: BackPressureMode::MonitorOnly,
            shard_task: RawScopeStats {
                cancellation_count: 4,
                limit_reached_count: 5,
                resource_usage: full_tracker_map(),
            },
            task: RawScopeStats {
                cancellation_count: 6,
                limit_reached_count: 7,
                resource_usage: full_tracker_map(),
            },
        }
    }

    #[test]
    fn test_build_projects_both_scopes() {
        let builder = SnapshotBuilder::new(Arc::new(FixedSource(view())));
        let snapshot = builder.build().unwrap();

        assert_eq!(snapshot.node_id, "node-1");
        assert_eq!(snapshot.mode, BackPressureMode::MonitorOnly);
        assert_eq!(snapshot.shard_task_stats.cancellation_count, 4);
        assert_eq!(snapshot.shard_task_stats.limit_reached_count, 5);
        assert_eq!(snapshot.task_stats.cancellation_count, 6);
        assert_eq!(snapshot.task_stats.limit_reached_count, 7);
        assert_eq!(
            snapshot
                .task_stats
                .resource_usage
                .get(TrackerKind::CpuUsage)
                .cancellation_count(),
            2
        );
    }

    #[test]
    fn test_build_fails_when_source_offline() {
        let builder = SnapshotBuilder::new(Arc::new(OfflineSource));
        assert!(matches!(
            builder.build(),
            Err(TelemetryError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn test_build_fails_on_missing_tracker() {
        let mut broken = view();
        broken.task.resource_usage.remove(&TrackerKind::HeapUsage);

        let builder = SnapshotBuilder::new(Arc::new(FixedSource(broken)));
        match builder.build() {
            Err(TelemetryError::UpstreamUnavailable(msg)) => {
                assert!(msg.contains("HEAP_USAGE"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_labels_round_trip() {
        for mode in [
            BackPressureMode::Disabled,
            BackPressureMode::MonitorOnly,
            BackPressureMode::Enforced,
        ] {
            assert_eq!(mode.as_str().parse::<BackPressureMode>().unwrap(), mode);
        }
        assert!("SOMETHING_ELSE".parse::<BackPressureMode>().is_err());
    }
}
