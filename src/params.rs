use serde::Deserialize;
use std::collections::BTreeMap;

/// How a parameter is carried on the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Presence of the attribute means `true`, absence means `false`
    Flag,
    /// The attribute value is the parameter value
    Valued,
}

/// Supported parameter types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Flag,
}

/// The value a parameter takes when its attribute is unset or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Text(&'static str),
    Integer(i64),
    Off,
    /// No default: the parameter resolves to [`ParamValue::Absent`]
    Absent,
}

/// A parameter definition in a component kind's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    /// camelCase attribute name
    pub name: &'static str,
    pub param_type: ParamType,
    pub default: ParamDefault,
}

impl ParamDef {
    pub const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            param_type: ParamType::Text,
            default: ParamDefault::Text(default),
        }
    }

    /// A valued parameter with no default
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            param_type: ParamType::Text,
            default: ParamDefault::Absent,
        }
    }

    pub const fn integer(name: &'static str, default: i64) -> Self {
        Self {
            name,
            param_type: ParamType::Integer,
            default: ParamDefault::Integer(default),
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            param_type: ParamType::Flag,
            default: ParamDefault::Off,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self.param_type {
            ParamType::Flag => Encoding::Flag,
            ParamType::Text | ParamType::Integer => Encoding::Valued,
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match self.default {
            ParamDefault::Text(s) => ParamValue::Text(s.to_string()),
            ParamDefault::Integer(n) => ParamValue::Integer(n),
            ParamDefault::Off => ParamValue::Flag(false),
            ParamDefault::Absent => ParamValue::Absent,
        }
    }

    /// Decode a raw attribute value into its effective value.
    ///
    /// Unset and empty attributes normalize to the default, so an explicit
    /// default and an omitted attribute decode identically. Returns an
    /// advisory alongside the value when the raw text could not be used.
    pub fn decode(&self, raw: Option<&str>) -> (ParamValue, Option<DecodeAdvisory>) {
        match self.param_type {
            ParamType::Flag => (ParamValue::Flag(raw.is_some()), None),
            ParamType::Text => match raw.filter(|s| !s.is_empty()) {
                Some(s) => (ParamValue::Text(s.to_string()), None),
                None => (self.default_value(), None),
            },
            ParamType::Integer => match raw.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => match s.parse::<i64>() {
                    Ok(n) => (ParamValue::Integer(n), None),
                    Err(_) => (
                        self.default_value(),
                        Some(DecodeAdvisory {
                            param: self.name,
                            value: s.to_string(),
                            reason: "expected an integer; using the default".to_string(),
                        }),
                    ),
                },
                None => (self.default_value(), None),
            },
        }
    }

    /// Encode a value back into its attribute form. `None` means the
    /// attribute should be removed.
    pub fn encode(&self, value: &ParamValue) -> Option<String> {
        match (self.encoding(), value) {
            (Encoding::Flag, ParamValue::Flag(true)) => Some(String::new()),
            (Encoding::Flag, _) => None,
            (Encoding::Valued, ParamValue::Text(s)) => Some(s.clone()),
            (Encoding::Valued, ParamValue::Integer(n)) => Some(n.to_string()),
            (Encoding::Valued, ParamValue::Flag(_) | ParamValue::Absent) => None,
        }
    }
}

/// A decoded parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Flag(bool),
    Absent,
}

/// A raw value that could not be decoded as given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAdvisory {
    pub param: &'static str,
    pub value: String,
    pub reason: String,
}

/// Raw attribute storage for one element, keyed by attribute name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the previous raw value
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.to_string(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Effective parameter values of one instance, in the kind's declared order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Params {
    values: Vec<(&'static str, ParamValue)>,
}

impl Params {
    /// Resolve every parameter of `defs` against `attrs`
    pub fn resolve(defs: &[ParamDef], attrs: &Attributes) -> (Self, Vec<DecodeAdvisory>) {
        let mut advisories = Vec::new();
        let values = defs
            .iter()
            .map(|def| {
                let (value, advisory) = def.decode(attrs.get(def.name));
                advisories.extend(advisory);
                (def.name, value)
            })
            .collect();
        (Self { values }, advisories)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Text value, or `""` when absent or not text
    pub fn text(&self, name: &str) -> &str {
        self.opt_text(name).unwrap_or("")
    }

    pub fn opt_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(ParamValue::Flag(true)))
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ParamValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
