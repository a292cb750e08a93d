use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MetadataFilter {
    Eq(String, Value),
    In(String, Vec<Value>),
    Range {
        key: String,
        min: Option<Value>,
        max: Option<Value>,
    },
    All(Vec<MetadataFilter>),
    Any(Vec<MetadataFilter>),
}

impl MetadataFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        MetadataFilter::Eq(key.into(), value.into())
    }

    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        match self {
            MetadataFilter::Eq(key, value) => metadata.get(key) == Some(value),
            MetadataFilter::In(key, values) => metadata
                .get(key)
                .map_or(false, |entry| values.contains(entry)),
            MetadataFilter::Range { key, min, max } => {
                let Some(value) = metadata.get(key).and_then(Value::as_f64) else {
                    return false;
                };
                let above_min = match min {
                    Some(min) => min.as_f64().map_or(false, |min| value >= min),
                    None => true,
                };
                let below_max = match max {
                    Some(max) => max.as_f64().map_or(false, |max| value <= max),
                    None => true,
                };
                above_min && below_max
            }
            MetadataFilter::All(filters) => filters.iter().all(|filter| filter.matches(metadata)),
            MetadataFilter::Any(filters) => filters.iter().any(|filter| filter.matches(metadata)),
        }
    }
}
