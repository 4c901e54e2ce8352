use thiserror::Error;

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskError {
    #[error("unrecognized task '{name}'")]
    UnrecognizedTask { name: String },

    // Definition-time contract violations.
    #[error("invalid param name '{name}' in task '{task}': use lowerCamelCase")]
    InvalidParamNameCasing { task: String, name: String },
    #[error("param '{name}' is already defined in task '{task}'")]
    ParamAlreadyDefined { task: String, name: String },
    #[error("param '{name}' of task '{task}' clashes with a global parameter")]
    ParamClashesWithGlobal { task: String, name: String },
    #[error("default value for param '{name}' of task '{task}' is not allowed: the param is mandatory")]
    DefaultInMandatoryParam { task: String, name: String },
    #[error("default value for param '{name}' of task '{task}' does not match type {expected}")]
    DefaultValueWrongType {
        task: String,
        name: String,
        expected: &'static str,
    },
    #[error("positional param '{name}' of task '{task}' follows a variadic one")]
    ParamAfterVariadic { task: String, name: String },
    #[error("mandatory positional param '{name}' of task '{task}' follows an optional one")]
    MandatoryParamAfterOptional { task: String, name: String },

    // Command line resolution.
    #[error("invalid argument '{argument}': command line params must be lowercase")]
    InvalidArgumentCasing { argument: String },
    #[error("unrecognized command line argument '{argument}'")]
    UnrecognizedCommandLineArg { argument: String },
    #[error("unrecognized param '{argument}'")]
    UnrecognizedParamName { argument: String },
    #[error("missing value for argument '{argument}'")]
    MissingTaskArgument { argument: String },
    #[error("missing positional argument '{name}'")]
    MissingPositionalArg { name: String },
    #[error("unrecognized positional argument '{argument}'")]
    UnrecognizedPositionalArg { argument: String },
    #[error("param '{argument}' was given more than once")]
    RepeatedParam { argument: String },
    #[error("invalid value '{value}' for argument '{name}' of type {expected}")]
    InvalidArgumentValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    #[error("invalid value '{value}' in environment variable {variable}: {reason}")]
    InvalidEnvArgumentValue {
        variable: String,
        value: String,
        reason: String,
    },
}

impl TaskError {
    pub fn unrecognized_task(name: impl Into<String>) -> Self {
        TaskError::UnrecognizedTask { name: name.into() }
    }

    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        TaskError::InvalidArgumentValue {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }
}
