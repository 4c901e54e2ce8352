use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::ParamType;

/// Named parameters keyed by their internal (lowerCamelCase) name.
///
/// A `BTreeMap` keeps iteration in lexicographic name order, which is the
/// order every usage and detail list is rendered in.
pub type ParamDefinitionsMap = BTreeMap<String, ParamDefinition>;

/// Resolved arguments, keyed by internal parameter name.
pub type TaskArguments = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub is_optional: bool,
    pub is_flag: bool,
    pub is_variadic: bool,
}

impl ParamDefinition {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            description: None,
            param_type,
            default_value: None,
            is_optional: false,
            is_flag: false,
            is_variadic: false,
        }
    }

    /// Boolean parameter that takes no value token; absence means `false`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            default_value: Some(Value::Bool(false)),
            is_optional: true,
            is_flag: true,
            ..Self::new(name, ParamType::Boolean)
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self, default_value: Option<Value>) -> Self {
        self.is_optional = true;
        self.default_value = default_value;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    /// Text of the `(default: ...)` annotation when this definition shows one.
    ///
    /// Flags never show it: their absence already means `false`.
    pub(crate) fn default_annotation(&self) -> Option<String> {
        if !self.is_optional || self.is_flag {
            return None;
        }
        self.default_value
            .as_ref()
            .map(|v| format!("(default: {})", json_text(v)))
    }
}

fn json_text(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
