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

//! Service for registering collectors and driving their collection cycles.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use vigil_core::telemetry::{MetricCollector, MetricQueue};

/// A thread-safe registry for metric collectors.
#[derive(Debug, Clone)]
pub struct CollectorRegistry {
    collectors: Arc<Mutex<Vec<Arc<dyn MetricCollector>>>>,
}

impl CollectorRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            collectors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a collector. Collection order follows registration order.
    pub fn register(&self, collector: Arc<dyn MetricCollector>) {
        let mut collectors_guard = self.collectors.lock().unwrap();
        let collector_name = collector.collector_name().to_string();
        collectors_guard.push(collector);
        log::info!("Registered collector: {}", collector_name);
    }

    /// Runs one collection cycle on every registered collector.
    pub fn collect_all(&self, timestamp_ms: u64) {
        let collectors_guard = self.collectors.lock().unwrap();
        for collector in collectors_guard.iter() {
            collector.collect(timestamp_ms);
        }
    }

    /// The number of registered collectors.
    pub fn len(&self) -> usize {
        self.collectors.lock().unwrap().len()
    }

    /// Whether the registry holds no collectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the collector family on a fixed cadence.
///
/// `tick` is cheap to call from any host loop; it fires a collection cycle
/// only when the configured interval has elapsed. Retry cadence lives here
/// and nowhere else: a skipped or failed cycle is simply superseded by the
/// next tick.
#[derive(Debug)]
pub struct TelemetryService {
    registry: CollectorRegistry,
    queue: MetricQueue,
    last_update: Instant,
    update_interval: Duration,
}

impl TelemetryService {
    /// Creates a service publishing onto `queue` with the given cycle
    /// interval.
    pub fn new(queue: MetricQueue, update_interval: Duration) -> Self {
        Self {
            registry: CollectorRegistry::new(),
            queue,
            last_update: Instant::now(),
            update_interval,
        }
    }

    /// Should be called periodically from the host loop. Runs a collection
    /// cycle if the interval has passed; returns whether one ran.
    pub fn tick(&mut self) -> bool {
        if self.last_update.elapsed() >= self.update_interval {
            log::trace!("Running collection cycle...");
            self.registry.collect_all(wall_clock_ms());
            self.last_update = Instant::now();
            true
        } else {
            false
        }
    }

    /// The collector registry.
    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// The shared outbound queue.
    pub fn queue(&self) -> &MetricQueue {
        &self.queue
    }

    /// The current cycle interval.
    pub fn interval(&self) -> Duration {
        self.update_interval
    }

    /// Sets a new cycle interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.update_interval = interval;
    }
}

/// Wall-clock milliseconds since the Unix epoch.
fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::sync::atomic::{AtomicU64, Ordering};
    use vigil_core::telemetry::{MetricRecord, TopicSchema};

    const PROBE_SCHEMA: TopicSchema = TopicSchema {
        topic: "probe",
        fields: &[],
    };

    #[derive(Debug)]
    struct ProbeCollector {
        queue: MetricQueue,
        cycles: AtomicU64,
    }

    impl MetricCollector for ProbeCollector {
        fn collector_name(&self) -> Cow<'static, str> {
            Cow::Borrowed("probe")
        }

        fn topic_schema(&self) -> &'static TopicSchema {
            &PROBE_SCHEMA
        }

        fn collect(&self, timestamp_ms: u64) {
            self.cycles.fetch_add(1, Ordering::SeqCst);
            let _ = self.queue.publish(MetricRecord::new("probe", timestamp_ms));
        }
    }

    #[test]
    fn test_registry_collects_in_registration_order() {
        let queue = MetricQueue::bounded(8);
        let registry = CollectorRegistry::new();

        let first = Arc::new(ProbeCollector {
            queue: queue.clone(),
            cycles: AtomicU64::new(0),
        });
        let second = Arc::new(ProbeCollector {
            queue: queue.clone(),
            cycles: AtomicU64::new(0),
        });
        registry.register(first.clone());
        registry.register(second.clone());
        assert_eq!(registry.len(), 2);

        registry.collect_all(9);
        assert_eq!(first.cycles.load(Ordering::SeqCst), 1);
        assert_eq!(second.cycles.load(Ordering::SeqCst), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_tick_respects_interval() {
        let _ = env_logger::builder().is_test(true).try_init();

        let queue = MetricQueue::bounded(8);
        let mut service = TelemetryService::new(queue.clone(), Duration::from_secs(3600));
        service.registry().register(Arc::new(ProbeCollector {
            queue: queue.clone(),
            cycles: AtomicU64::new(0),
        }));

        // A fresh service with a long interval does not fire immediately.
        assert!(!service.tick());
        assert!(queue.is_empty());

        // A zero interval fires on every tick.
        service.set_interval(Duration::ZERO);
        assert!(service.tick());
        assert!(service.tick());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_interval_accessors() {
        let mut service =
            TelemetryService::new(MetricQueue::bounded(8), Duration::from_secs(5));
        assert_eq!(service.interval(), Duration::from_secs(5));
        service.set_interval(Duration::from_secs(15));
        assert_eq!(service.interval(), Duration::from_secs(15));
    }
}
