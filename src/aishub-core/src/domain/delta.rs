use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::BoundingBox;

pub static SOURCE_LABEL: &str = "aishub";
pub static BOUNDING_BOX_PATH: &str = "sensors.ais.boundingBox";

/// A normalized, path addressed set of values about one context.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Delta {
    pub context: String,
    pub updates: Vec<Update>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Update {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub source: Source,
    pub values: Vec<PathValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    pub label: String,
}

/// A value addressed by a dotted path, the empty path addresses the context root.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl Delta {
    pub fn new(context: impl Into<String>, timestamp: Option<String>) -> Delta {
        Delta {
            context: context.into(),
            updates: vec![Update {
                timestamp,
                source: Source::default(),
                values: Vec::new(),
            }],
        }
    }

    /// The delta announcing which area is being tracked for the observer.
    pub fn bounding_box(self_context: impl Into<String>, bbox: &BoundingBox) -> Delta {
        let mut delta = Delta::new(self_context, None);
        // BoundingBox only holds f64s which always serialize.
        if let Ok(value) = serde_json::to_value(bbox) {
            delta.push(BOUNDING_BOX_PATH, value);
        }
        delta
    }

    pub fn push(&mut self, path: impl Into<String>, value: Value) {
        if let Some(update) = self.updates.first_mut() {
            update.values.push(PathValue {
                path: path.into(),
                value,
            });
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.updates.first().and_then(|u| u.timestamp.as_deref())
    }

    pub fn values(&self) -> impl Iterator<Item = &PathValue> {
        self.updates.iter().flat_map(|u| u.values.iter())
    }

    /// The value published under `path`, root values are looked up by their key.
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.values().find_map(|v| {
            if v.path == path {
                Some(&v.value)
            } else if v.path.is_empty() {
                v.value.get(path)
            } else {
                None
            }
        })
    }
}

impl Default for Source {
    fn default() -> Self {
        Source {
            label: SOURCE_LABEL.to_string(),
        }
    }
}
