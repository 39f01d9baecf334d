use std::borrow::Cow;
use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::GatewayError;

pub struct RequestBuilder {
    body: serde_json::Map<String, Value>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            body: serde_json::Map::new(),
        }
    }

    pub fn add_required<T: Into<Value>>(mut self, key: &str, value: T) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.body)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Body accepted by `POST /generate`.
///
/// Field names match case-insensitively and the last matching key wins.
/// Absent or `null` fields leave the value empty; unknown keys are skipped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
}

impl<'de> Deserialize<'de> for GenerateRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GenerateRequestVisitor)
    }
}

struct GenerateRequestVisitor;

impl<'de> Visitor<'de> for GenerateRequestVisitor {
    type Value = GenerateRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with string fields `model` and `prompt`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut request = GenerateRequest::default();

        while let Some(key) = map.next_key::<Cow<'de, str>>()? {
            let slot = if key.eq_ignore_ascii_case("model") {
                &mut request.model
            } else if key.eq_ignore_ascii_case("prompt") {
                &mut request.prompt
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            if let Some(value) = map.next_value::<Option<String>>()? {
                *slot = value;
            }
        }

        Ok(request)
    }
}

impl GenerateRequest {
    /// Decodes the first JSON value of a caller body; anything after it is
    /// ignored. A literal `null` is treated as an empty object.
    pub fn decode(body: &[u8]) -> Result<Self, GatewayError> {
        let first = serde_json::Deserializer::from_slice(body)
            .into_iter::<Option<GenerateRequest>>()
            .next();

        match first {
            Some(Ok(request)) => Ok(request.unwrap_or_default()),
            Some(Err(e)) => {
                log::debug!("rejecting generate body: {}", e);
                Err(GatewayError::invalid_body())
            }
            None => {
                log::debug!("rejecting empty generate body");
                Err(GatewayError::invalid_body())
            }
        }
    }

    pub fn to_upstream_payload(&self) -> Value {
        RequestBuilder::new()
            .add_required("model", self.model.as_str())
            .add_required("prompt", self.prompt.as_str())
            .build()
    }
}

pub fn encode_payload(payload: &Value) -> Result<Vec<u8>, GatewayError> {
    serde_json::to_vec(payload).map_err(GatewayError::marshal)
}
