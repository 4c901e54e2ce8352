use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{TaskError, TaskResult};
use crate::params::{ParamDefinition, ParamDefinitionsMap};
use crate::types::ParamType;

/// A task's identity plus its full parameter schema.
///
/// Built once through the `add_*` methods, which enforce the schema rules
/// (unique names, optional positionals last, variadic last), then handed to
/// a [`TaskRegistry`] and never mutated again.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_internal: bool,
    pub param_definitions: ParamDefinitionsMap,
    pub positional_param_definitions: Vec<ParamDefinition>,
    #[serde(skip)]
    reserved_names: BTreeSet<String>,
}

/// Schema equality; the reserved global names are not part of the schema.
impl PartialEq for TaskDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.is_internal == other.is_internal
            && self.param_definitions == other.param_definitions
            && self.positional_param_definitions == other.positional_param_definitions
    }
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_internal: false,
            param_definitions: ParamDefinitionsMap::new(),
            positional_param_definitions: Vec::new(),
            reserved_names: BTreeSet::new(),
        }
    }

    /// Task hidden from the default task listing.
    pub fn new_internal(name: impl Into<String>) -> Self {
        Self {
            is_internal: true,
            ..Self::new(name)
        }
    }

    /// Reserve the global parameter names so task params cannot shadow them.
    pub fn with_globals(mut self, globals: &ParamDefinitionsMap) -> Self {
        self.reserved_names.extend(globals.keys().cloned());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_param(
        mut self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
        is_optional: bool,
    ) -> TaskResult<Self> {
        self.check_name(name)?;
        self.check_default(name, default_value.as_ref(), param_type, is_optional)?;
        let mut def = ParamDefinition::new(name, param_type);
        def.description = description.map(str::to_string);
        if is_optional {
            def = def.optional(default_value);
        }
        self.param_definitions.insert(name.to_string(), def);
        Ok(self)
    }

    pub fn add_optional_param(
        self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
    ) -> TaskResult<Self> {
        self.add_param(name, description, default_value, param_type, true)
    }

    pub fn add_flag(mut self, name: &str, description: Option<&str>) -> TaskResult<Self> {
        self.check_name(name)?;
        let mut def = ParamDefinition::flag(name);
        def.description = description.map(str::to_string);
        self.param_definitions.insert(name.to_string(), def);
        Ok(self)
    }

    pub fn add_positional_param(
        mut self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
        is_optional: bool,
    ) -> TaskResult<Self> {
        self.check_name(name)?;
        self.check_positional_order(name, is_optional)?;
        self.check_default(name, default_value.as_ref(), param_type, is_optional)?;
        let mut def = ParamDefinition::new(name, param_type);
        def.description = description.map(str::to_string);
        if is_optional {
            def = def.optional(default_value);
        }
        self.positional_param_definitions.push(def);
        Ok(self)
    }

    pub fn add_optional_positional_param(
        self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
    ) -> TaskResult<Self> {
        self.add_positional_param(name, description, default_value, param_type, true)
    }

    /// Positional param that swallows every remaining token.
    ///
    /// A scalar default is wrapped into a one-element array.
    pub fn add_variadic_positional_param(
        mut self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
        is_optional: bool,
    ) -> TaskResult<Self> {
        self.check_name(name)?;
        self.check_positional_order(name, is_optional)?;
        let default_value = default_value.map(|v| match v {
            Value::Array(_) => v,
            other => Value::Array(vec![other]),
        });
        if let Some(Value::Array(items)) = &default_value {
            if !is_optional {
                return Err(TaskError::DefaultInMandatoryParam {
                    task: self.name.clone(),
                    name: name.to_string(),
                });
            }
            if !items.iter().all(|item| param_type.validate(item)) {
                return Err(TaskError::DefaultValueWrongType {
                    task: self.name.clone(),
                    name: name.to_string(),
                    expected: param_type.display_token(),
                });
            }
        }
        let mut def = ParamDefinition::new(name, param_type).variadic();
        def.description = description.map(str::to_string);
        if is_optional {
            def = def.optional(default_value);
        }
        self.positional_param_definitions.push(def);
        Ok(self)
    }

    pub fn add_optional_variadic_positional_param(
        self,
        name: &str,
        description: Option<&str>,
        default_value: Option<Value>,
        param_type: ParamType,
    ) -> TaskResult<Self> {
        self.add_variadic_positional_param(name, description, default_value, param_type, true)
    }

    fn check_name(&self, name: &str) -> TaskResult<()> {
        if !is_valid_param_name(name) {
            return Err(TaskError::InvalidParamNameCasing {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        let taken = self.param_definitions.contains_key(name)
            || self
                .positional_param_definitions
                .iter()
                .any(|p| p.name == name);
        if taken {
            return Err(TaskError::ParamAlreadyDefined {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        if self.reserved_names.contains(name) {
            return Err(TaskError::ParamClashesWithGlobal {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_default(
        &self,
        name: &str,
        default_value: Option<&Value>,
        param_type: ParamType,
        is_optional: bool,
    ) -> TaskResult<()> {
        let Some(value) = default_value else {
            return Ok(());
        };
        if !is_optional {
            return Err(TaskError::DefaultInMandatoryParam {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        if !param_type.validate(value) {
            return Err(TaskError::DefaultValueWrongType {
                task: self.name.clone(),
                name: name.to_string(),
                expected: param_type.display_token(),
            });
        }
        Ok(())
    }

    fn check_positional_order(&self, name: &str, is_optional: bool) -> TaskResult<()> {
        let Some(last) = self.positional_param_definitions.last() else {
            return Ok(());
        };
        if last.is_variadic {
            return Err(TaskError::ParamAfterVariadic {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        if last.is_optional && !is_optional {
            return Err(TaskError::MandatoryParamAfterOptional {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

fn is_valid_param_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    matches!(bytes.next(), Some(b'a'..=b'z')) && bytes.all(|b| b.is_ascii_alphanumeric())
}

/// Task name -> definition. Iterates in name order.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskDefinition>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `task`, replacing (and returning) a previous one with the same name.
    pub fn insert(&mut self, task: TaskDefinition) -> Option<TaskDefinition> {
        let previous = self.tasks.insert(task.name.clone(), task);
        if let Some(prev) = &previous {
            tracing::warn!(task = %prev.name, "task definition overridden");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<TaskDefinition> for TaskRegistry {
    fn from_iter<I: IntoIterator<Item = TaskDefinition>>(iter: I) -> Self {
        let mut registry = TaskRegistry::new();
        for task in iter {
            registry.insert(task);
        }
        registry
    }
}
