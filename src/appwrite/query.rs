//! Appwrite query language.
//!
//! Appwrite (1.5+) takes list filters as JSON strings passed through repeated
//! `queries[]` parameters, e.g. `{"method":"equal","attribute":"email","values":["a@b.c"]}`.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<QueryValue>,
}

/// A query operand: a scalar, or a nested query for logical methods.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum QueryValue {
    Nested(Query),
    Scalar(Value),
}

impl Query {
    fn new(method: &'static str, attribute: Option<&str>, values: Vec<QueryValue>) -> Self {
        Self {
            method,
            attribute: attribute.map(str::to_string),
            values,
        }
    }

    /// Attribute equals any of `values`.
    #[must_use]
    pub fn equal<I, V>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            "equal",
            Some(attribute),
            values
                .into_iter()
                .map(|value| QueryValue::Scalar(value.into()))
                .collect(),
        )
    }

    /// String attribute contains a substring, or array attribute contains an element.
    #[must_use]
    pub fn contains<I, V>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            "contains",
            Some(attribute),
            values
                .into_iter()
                .map(|value| QueryValue::Scalar(value.into()))
                .collect(),
        )
    }

    /// Any of the nested queries matches.
    #[must_use]
    pub fn or(queries: Vec<Query>) -> Self {
        let values = queries.into_iter().map(QueryValue::Nested).collect();
        Self::new("or", None, values)
    }

    #[must_use]
    pub fn order_asc(attribute: &str) -> Self {
        Self::new("orderAsc", Some(attribute), Vec::new())
    }

    #[must_use]
    pub fn order_desc(attribute: &str) -> Self {
        Self::new("orderDesc", Some(attribute), Vec::new())
    }

    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self::new("limit", None, vec![QueryValue::Scalar(Value::from(limit))])
    }

    #[must_use]
    pub fn method(&self) -> &str {
        self.method
    }

    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    #[must_use]
    pub fn values(&self) -> &[QueryValue] {
        &self.values
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}
