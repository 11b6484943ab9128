//! Per-operation time budgets

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Longest budget a `timeouts` block may ask for.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The four resource operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock budget for each operation on one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::minutes(30, 5, 30, 30)
    }
}

impl Timeouts {
    pub const fn minutes(create: u64, read: u64, update: u64, delete: u64) -> Self {
        Self {
            create: Duration::from_secs(create * 60),
            read: Duration::from_secs(read * 60),
            update: Duration::from_secs(update * 60),
            delete: Duration::from_secs(delete * 60),
        }
    }

    /// Budget for a read-only data source.
    pub const fn read_only(read: u64) -> Self {
        let read = Duration::from_secs(read * 60);
        Self {
            create: read,
            read,
            update: read,
            delete: read,
        }
    }

    pub fn for_operation(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Apply a user `timeouts` block such as `{"create": "90m", "delete": "2h"}`.
    ///
    /// A single-element list holding that object is accepted as well.
    pub fn with_overrides(mut self, block: Option<&Value>) -> Result<Self> {
        let block = match block {
            None | Some(Value::Null) => return Ok(self),
            Some(Value::Array(items)) if items.len() == 1 => &items[0],
            Some(other) => other,
        };
        let Value::Object(map) = block else {
            return Err(Error::validation("timeouts", "expected a block of durations"));
        };

        let mut messages = Vec::new();
        for (key, value) in map {
            let slot = match key.as_str() {
                "create" => &mut self.create,
                "read" => &mut self.read,
                "update" => &mut self.update,
                "delete" => &mut self.delete,
                other => {
                    messages.push(format!("{}: unsupported timeout", other));
                    continue;
                },
            };
            match value.as_str().map(humantime::parse_duration) {
                Some(Ok(duration)) if duration > MAX_TIMEOUT => messages.push(format!(
                    "{}: {} exceeds the maximum of {}",
                    key,
                    value,
                    humantime::format_duration(MAX_TIMEOUT)
                )),
                Some(Ok(duration)) if !duration.is_zero() => *slot = duration,
                _ => messages.push(format!("{}: expected a duration such as \"90m\", got {}", key, value)),
            }
        }

        if messages.is_empty() {
            Ok(self)
        } else {
            Err(Error::Validation {
                target: "timeouts".to_string(),
                messages,
            })
        }
    }
}
