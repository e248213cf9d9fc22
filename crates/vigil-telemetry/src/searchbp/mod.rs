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

//! Search back-pressure statistics collection.
//!
//! The search admission-control subsystem cancels or limits search tasks and
//! shard tasks when their resource usage crosses configured thresholds, and
//! aggregates what it did into per-scope counters and per-tracker usage
//! statistics. This module samples that aggregated state once per cycle and
//! publishes it as a single flattened record.

pub mod collector;
pub mod serializer;
pub mod snapshot;
pub mod stats;

pub use self::collector::SearchBackPressureCollector;
pub use self::snapshot::{
    BackPressureMode, BackPressureSnapshot, BackPressureSource, BackPressureStateView,
    RawScopeStats, SnapshotBuilder,
};
pub use self::stats::{ResourceUsage, TaskScopeStats, TrackerKind, TrackerUsageSet};
