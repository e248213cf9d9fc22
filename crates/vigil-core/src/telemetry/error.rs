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

//! Error types shared across the telemetry subsystem.

use std::fmt::Display;

/// A specialized `Result` type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// An error that can occur while collecting or publishing telemetry.
#[derive(Debug, Clone)]
pub enum TelemetryError {
    /// The upstream subsystem a collector reads from is unreachable or has
    /// not finished initializing. Recoverable: the cycle is skipped and the
    /// next scheduled tick reads again.
    UpstreamUnavailable(String),
    /// A raw emission was checked against its topic schema and the supplied
    /// values did not match the declared fields. This is a code-level
    /// contract violation, not an environmental condition, and is surfaced
    /// to the caller rather than swallowed.
    SchemaViolation {
        /// The topic whose schema was violated.
        topic: &'static str,
        /// What was wrong with the supplied values.
        detail: String,
    },
    /// The outbound queue is at capacity; the record was rejected.
    QueueFull,
    /// The outbound queue has no remaining consumer.
    QueueClosed,
}

impl Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::UpstreamUnavailable(msg) => {
                write!(f, "Upstream unavailable: {msg}")
            }
            TelemetryError::SchemaViolation { topic, detail } => {
                write!(f, "Schema violation for topic `{topic}`: {detail}")
            }
            TelemetryError::QueueFull => write!(f, "Outbound queue full, record rejected"),
            TelemetryError::QueueClosed => write!(f, "Outbound queue has no consumer"),
        }
    }
}

impl std::error::Error for TelemetryError {}
