//! ParamValue - untyped parameter values at the host boundary
//!
//! The host configuration framework hands the bridge dynamically typed
//! values. They are modeled as a tagged union with an explicit coercion
//! table; anything outside the table is rejected, never silently defaulted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a device setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    /// Floating-point device node, verified with relative tolerance
    Float,

    /// Integer device node, verified exactly
    Int,

    /// Boolean device node, verified exactly
    Bool,

    /// Enumeration device node addressed by entry name
    Enum,
}

impl SettingKind {
    /// Parse a kind token from the parameter map file.
    ///
    /// Returns `None` for unknown tokens; the descriptor then carries no
    /// effective type and is rejected when a value arrives for it.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "float" => Some(Self::Float),
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Token form, as written in the parameter map file
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamically typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean value
    Bool(bool),

    /// Integer value
    Int(i64),

    /// Floating-point value
    Float(f64),

    /// String value (enum entry names)
    Str(String),
}

impl ParamValue {
    /// Coerce to a floating-point number.
    ///
    /// Accepts `Float` and `Int` (widened); everything else is rejected.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Coerce to an integer.
    ///
    /// Accepts `Int` and `Float` (truncated); everything else is rejected.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Coerce to a boolean.
    ///
    /// Accepts `Bool` and `Int` (non-zero is true); everything else is
    /// rejected.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            ParamValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// String form with any enclosing quote characters removed.
    ///
    /// Enum values arrive from some hosts as quoted display strings; the
    /// device expects the bare entry name.
    pub fn as_enum_entry(&self) -> String {
        let s = self.to_string();
        s.chars().filter(|c| *c != '"').collect()
    }

    /// Human-readable type tag for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v}"),
        }
    }
}

/// A single changed setting delivered by the host framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamUpdate {
    /// Logical setting name
    pub name: String,

    /// New value
    pub value: ParamValue,
}

impl ParamUpdate {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
