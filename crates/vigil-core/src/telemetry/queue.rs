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

//! Bounded outbound queue shared by the collector family.

use crate::telemetry::error::{TelemetryError, TelemetryResult};
use crate::telemetry::record::MetricRecord;
use flume::{Receiver, Sender, TrySendError};

/// A bounded, thread-safe queue for outbound metric records.
///
/// Every collector publishes onto one shared queue and a downstream reader
/// drains it. Publishing never blocks: when the queue is at capacity the
/// record is rejected ([`TelemetryError::QueueFull`]) and the producer
/// decides what to do with it. A stalled consumer must never stall
/// collection, and the next cycle supersedes a rejected sample. Clones share
/// the same channel, so handing a clone to each collector is cheap.
#[derive(Debug, Clone)]
pub struct MetricQueue {
    tx: Sender<MetricRecord>,
    rx: Receiver<MetricRecord>,
}

impl MetricQueue {
    /// Creates a queue holding at most `capacity` records.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = flume::bounded(capacity);
        Self { tx, rx }
    }

    /// Publishes a record without blocking.
    ///
    /// Records from a single producer dequeue in the order they were
    /// published.
    pub fn publish(&self, record: MetricRecord) -> TelemetryResult<()> {
        self.tx.try_send(record).map_err(|e| match e {
            TrySendError::Full(_) => TelemetryError::QueueFull,
            TrySendError::Disconnected(_) => TelemetryError::QueueClosed,
        })
    }

    /// Removes and returns every record currently queued, oldest first.
    pub fn drain(&self) -> Vec<MetricRecord> {
        self.rx.try_iter().collect()
    }

    /// The number of records currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topic: &'static str) -> MetricRecord {
        MetricRecord::new(topic, 0)
    }

    #[test]
    fn test_publish_and_drain_fifo() {
        let queue = MetricQueue::bounded(8);
        queue.publish(record("first")).unwrap();
        queue.publish(record("second")).unwrap();

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].topic(), "first");
        assert_eq!(drained[1].topic(), "second");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overflow_rejects_new_record() {
        let queue = MetricQueue::bounded(2);
        queue.publish(record("kept-1")).unwrap();
        queue.publish(record("kept-2")).unwrap();

        let result = queue.publish(record("rejected"));
        assert!(matches!(result, Err(TelemetryError::QueueFull)));

        // The queued records are untouched by the rejected publish.
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].topic(), "kept-1");
        assert_eq!(drained[1].topic(), "kept-2");
    }

    #[test]
    fn test_concurrent_publishers() {
        let queue = MetricQueue::bounded(64);
        let mut handles = Vec::new();
        for _ in 0..4 {
            let handle = queue.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..8 {
                    handle.publish(record("shared")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(queue.len(), 32);
    }

    #[test]
    fn test_capacity_is_reported() {
        let queue = MetricQueue::bounded(16);
        assert_eq!(queue.capacity(), Some(16));
    }
}
