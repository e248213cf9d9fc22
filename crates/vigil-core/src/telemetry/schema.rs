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

//! Typed per-topic schema descriptors for the generic record path.
//!
//! Collectors that emit a fixed tuple of scalar values (rather than running
//! a dedicated serializer) describe their payload as an ordered list of
//! named, typed fields. Every raw emission is checked against the declared
//! descriptor, so a mismatched call site fails at the boundary instead of
//! producing a malformed record.

use crate::telemetry::error::{TelemetryError, TelemetryResult};
use crate::telemetry::record::MetricRecord;
use serde_json::Value;

/// The admissible types for a declared schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer counter or size.
    UInt,
    /// Real-valued measurement.
    Float,
    /// Free-form string (identifiers, mode labels).
    Str,
}

/// A single named, typed field of a topic schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// The field name as rendered in the record body.
    pub name: &'static str,
    /// The admissible value type.
    pub kind: FieldKind,
}

/// A scalar value supplied to the generic record path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// An unsigned integer value.
    UInt(u64),
    /// A floating-point value.
    Float(f64),
    /// A string value.
    Str(String),
}

impl FieldValue {
    fn kind(&self) -> FieldKind {
        match self {
            FieldValue::UInt(_) => FieldKind::UInt,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Str(_) => FieldKind::Str,
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::UInt(v) => Value::from(v),
            FieldValue::Float(v) => Value::from(v),
            FieldValue::Str(v) => Value::from(v),
        }
    }
}

/// An ordered description of the value fields a topic's raw emissions must
/// carry.
///
/// A topic whose body is produced by a dedicated serializer declares an
/// empty field list: its raw emissions carry the topic label alone, and
/// passing any values is a contract violation.
#[derive(Debug, Clone, Copy)]
pub struct TopicSchema {
    /// The topic label records of this family carry.
    pub topic: &'static str,
    /// The declared value fields, in render order.
    pub fields: &'static [FieldSpec],
}

impl TopicSchema {
    /// The declared arity of the raw-emission path.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// Formats one record through the shared fixed-arity path.
///
/// The supplied values must match the schema's declared fields in count and
/// type; any mismatch is a [`TelemetryError::SchemaViolation`] and no record
/// is produced.
pub fn format_record(
    schema: &TopicSchema,
    timestamp_ms: u64,
    values: &[FieldValue],
) -> TelemetryResult<MetricRecord> {
    if values.len() != schema.fields.len() {
        return Err(TelemetryError::SchemaViolation {
            topic: schema.topic,
            detail: format!(
                "{} values passed; {} expected",
                values.len(),
                schema.fields.len()
            ),
        });
    }
    let mut record = MetricRecord::new(schema.topic, timestamp_ms);
    for (spec, value) in schema.fields.iter().zip(values) {
        if value.kind() != spec.kind {
            return Err(TelemetryError::SchemaViolation {
                topic: schema.topic,
                detail: format!(
                    "field `{}` expects {:?}, got {:?}",
                    spec.name,
                    spec.kind,
                    value.kind()
                ),
            });
        }
        record.push_field(spec.name, value.clone());
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEARTBEAT: TopicSchema = TopicSchema {
        topic: "heartbeat",
        fields: &[
            FieldSpec {
                name: "uptime_secs",
                kind: FieldKind::UInt,
            },
            FieldSpec {
                name: "load",
                kind: FieldKind::Float,
            },
            FieldSpec {
                name: "host",
                kind: FieldKind::Str,
            },
        ],
    };

    const BARE: TopicSchema = TopicSchema {
        topic: "bare",
        fields: &[],
    };

    #[test]
    fn test_format_record_in_declared_order() {
        let record = format_record(
            &HEARTBEAT,
            7,
            &[
                FieldValue::UInt(31),
                FieldValue::Float(0.25),
                FieldValue::Str("node-1".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(record.topic(), "heartbeat");
        let keys: Vec<&str> = record.body().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["uptime_secs", "load", "host"]);
        assert_eq!(record.body()["load"], 0.25);
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let result = format_record(&BARE, 7, &[FieldValue::Str("dummy".to_string())]);
        match result {
            Err(TelemetryError::SchemaViolation { topic, detail }) => {
                assert_eq!(topic, "bare");
                assert!(detail.contains("1 values passed; 0 expected"));
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let result = format_record(
            &HEARTBEAT,
            7,
            &[
                FieldValue::Float(31.0),
                FieldValue::Float(0.25),
                FieldValue::Str("node-1".to_string()),
            ],
        );
        assert!(matches!(
            result,
            Err(TelemetryError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_zero_arity_topic_renders_label_alone() {
        let record = format_record(&BARE, 7, &[]).unwrap();
        assert_eq!(record.render(), "bare");
    }
}
