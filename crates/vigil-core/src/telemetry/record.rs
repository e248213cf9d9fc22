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

//! The outbound record type shared by all collectors.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// A single outbound telemetry record.
///
/// A record is a two-part value: a topic label identifying the family of the
/// payload, and a flat key/value body. The body keeps insertion order, and
/// downstream readers depend on the rendered field order, so the order a
/// serializer pushes fields in is part of the wire contract.
#[derive(Debug, Clone)]
pub struct MetricRecord {
    topic: Cow<'static, str>,
    timestamp_ms: u64,
    body: Map<String, Value>,
}

impl MetricRecord {
    /// Creates an empty record for the given topic.
    pub fn new(topic: impl Into<Cow<'static, str>>, timestamp_ms: u64) -> Self {
        Self {
            topic: topic.into(),
            timestamp_ms,
            body: Map::new(),
        }
    }

    /// Appends a field to the body. Fields render in the order they were
    /// pushed.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(name.into(), value.into());
    }

    /// The topic label.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wall-clock collection timestamp in milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// The flat body mapping, in insertion order.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Renders the wire form: the topic line, followed by the JSON body
    /// line when the body is non-empty.
    pub fn render(&self) -> String {
        if self.body.is_empty() {
            return self.topic.to_string();
        }
        match serde_json::to_string(&self.body) {
            Ok(body) => format!("{}\n{body}", self.topic),
            Err(e) => {
                log::error!("Failed to render record body for `{}`: {e}", self.topic);
                self.topic.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_renders_topic_only() {
        let record = MetricRecord::new("heartbeat", 1_153_721_339);
        assert_eq!(record.render(), "heartbeat");
        assert_eq!(record.timestamp_ms(), 1_153_721_339);
    }

    #[test]
    fn test_fields_render_in_push_order() {
        let mut record = MetricRecord::new("heartbeat", 0);
        record.push_field("zulu", 1u64);
        record.push_field("alpha", 2u64);
        record.push_field("mike", "three");

        let rendered = record.render();
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("heartbeat"));
        assert_eq!(
            lines.next(),
            Some(r#"{"zulu":1,"alpha":2,"mike":"three"}"#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_body_readable_by_name() {
        let mut record = MetricRecord::new("heartbeat", 0);
        record.push_field("uptime_secs", 42u64);
        assert_eq!(record.body().get("uptime_secs"), Some(&Value::from(42u64)));
    }
}
