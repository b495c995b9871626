//! Request side of the pagination contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// One filter entry as it arrives from a caller.
///
/// Callers send facets either as arrays or as comma-delimited strings, and
/// sometimes as something else entirely. The normalizer decides what each
/// shape means per kind; this type only keeps the shapes apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    List(Vec<Value>),
    /// Numbers, booleans, objects and `null`.
    Other(Value),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(values.into_iter().map(|v| Value::String(v.into())).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Other(Value::Null))
    }

    /// JSON form with object keys sorted at every depth.
    pub fn to_canonical_value(&self) -> Value {
        match self {
            FilterValue::Text(s) => Value::String(s.clone()),
            FilterValue::List(items) => Value::Array(items.iter().map(canonical_value).collect()),
            FilterValue::Other(value) => canonical_value(value),
        }
    }
}

/// Kind-specific filter mapping.
///
/// Keys are kept ordered so two mappings with the same entries serialize to
/// the same string regardless of the order they were built in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(key.into(), value)
    }

    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Deterministic serialization used for cache keys.
    pub fn canonical_string(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_canonical_value()))
            .collect();
        Value::Object(map).to_string()
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, FilterValue)>>(iter: I) -> Self {
        Filters(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Input to a page fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    /// Requested page size; clamped by the normalizer. Any JSON number is
    /// accepted and saturated into `i64`.
    #[serde(default, deserialize_with = "lenient_page_size", skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    /// Cursor from a prior page. `None` requests the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Filters::is_empty")]
    pub filters: Filters,
}

impl ResourceQuery {
    pub fn new(first: i64) -> Self {
        ResourceQuery {
            first: Some(first),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_page_size<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Number>::deserialize(deserializer)?.map(|n| saturate_to_i64(&n)))
}

/// Out-of-range integers saturate; floats truncate toward zero (NaN is 0).
fn saturate_to_i64(number: &Number) -> i64 {
    if let Some(i) = number.as_i64() {
        i
    } else if number.is_u64() {
        i64::MAX
    } else {
        number.as_f64().map(|f| f as i64).unwrap_or(0)
    }
}

fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical_value(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}
