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

//! Contracts implemented by collectors and their enablement gate.

use crate::telemetry::schema::TopicSchema;
use std::borrow::Cow;
use std::fmt::Debug;

/// The core trait for a periodic metric collector.
///
/// A collector knows how to sample one live subsystem and publish the result
/// as a record on the shared queue. The telemetry service holds a collection
/// of these and invokes `collect` on a timer; a cycle is synchronous and
/// bounded, and every cycle starts from scratch.
pub trait MetricCollector: Send + Sync + Debug + 'static {
    /// Stable identifier for this collector; doubles as its gate key.
    fn collector_name(&self) -> Cow<'static, str>;

    /// The schema of the topic this collector publishes under.
    fn topic_schema(&self) -> &'static TopicSchema;

    /// Runs one collection cycle with the given wall-clock timestamp.
    ///
    /// Implementations contain gate-disabled and upstream-unavailable
    /// conditions internally: a disabled or skipped cycle publishes nothing
    /// and returns normally.
    fn collect(&self, timestamp_ms: u64);
}

/// Decides whether a collector is active under the current configuration.
pub trait CollectorGate: Send + Sync + Debug {
    /// Returns whether the named collector should run its cycles.
    fn is_collector_enabled(&self, collector_name: &str) -> bool;
}
