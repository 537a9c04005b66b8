//! Common types and input normalization shared by the domain models

use serde::{Deserialize, Deserializer};
use url::Url;

/// Tri-state request field: distinguishes "not supplied" from "supplied".
///
/// A JSON `null` counts as not supplied. Use with `#[serde(default)]` so that a
/// missing key deserializes to [`Patch::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Set(value) => Patch::Set(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Unset => None,
            Patch::Set(value) => Some(value),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Unset,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Boolean accepting the permissive forms clients send for flags:
/// booleans, `1`/`0`, and strings such as `"yes"` or `"off"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LooseBool(pub bool);

impl From<LooseBool> for bool {
    fn from(value: LooseBool) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for LooseBool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let flag = match value {
            serde_json::Value::Bool(b) => b,
            serde_json::Value::Number(n) => n.as_f64() == Some(1.0),
            serde_json::Value::String(s) => coerce_bool(&s),
            _ => false,
        };
        Ok(LooseBool(flag))
    }
}

/// Permissive boolean coercion. `"1"`, `"true"`, `"on"` and `"yes"` (any case)
/// are true; everything else is false.
pub fn coerce_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Reduce a URL to its host component.
///
/// Input without a scheme has no host under URL parsing and normalizes to an
/// empty string, e.g. `"example.com"` -> `""`.
pub fn normalize_domain(raw: &str) -> String {
    Url::parse(raw.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_default()
}
