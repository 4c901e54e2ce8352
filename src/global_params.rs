use serde_json::Value;

use crate::cli_args::{param_name_to_cla, param_name_to_env_var};
use crate::error::{TaskError, TaskResult};
use crate::params::{ParamDefinition, ParamDefinitionsMap, TaskArguments};
use crate::types::ParamType;

/// Prefix of the environment variables that override global parameters.
pub const ENV_PREFIX: &str = "TASKRS";

pub fn builtin_global_params() -> ParamDefinitionsMap {
    [
        ParamDefinition::new("config", ParamType::String)
            .described("A custom config file.")
            .optional(None),
        ParamDefinition::flag("help")
            .described("Shows this message, or a task's help if its name is provided"),
        ParamDefinition::flag("showStackTraces").described("Show stack traces."),
        ParamDefinition::flag("verbose").described("Enables verbose logging"),
        ParamDefinition::flag("version").described("Shows version and exit."),
    ]
    .into_iter()
    .map(|def| (def.name.clone(), def))
    .collect()
}

/// Global argument values coming from the environment, defaults included.
///
/// `lookup` maps a variable name to its value; the binary passes
/// `std::env::var`, tests pass a closure over a fixed table.
pub fn env_global_arguments<F>(
    defs: &ParamDefinitionsMap,
    lookup: F,
) -> TaskResult<TaskArguments>
where
    F: Fn(&str) -> Option<String>,
{
    let mut arguments = TaskArguments::new();
    for (name, def) in defs {
        let variable = param_name_to_env_var(ENV_PREFIX, name);
        let value: Option<Value> = match lookup(&variable) {
            Some(raw) => {
                let value = def.param_type.parse(name, &raw).map_err(|e| {
                    TaskError::InvalidEnvArgumentValue {
                        variable: variable.clone(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                tracing::debug!(%variable, "global argument taken from environment");
                Some(value)
            }
            None => def.default_value.clone(),
        };
        if let Some(value) = value {
            arguments.insert(name.clone(), value);
        }
    }
    Ok(arguments)
}

/// Whether `--verbose` appears anywhere in `args` or the environment enables it.
///
/// Read before argument resolution so the log level is known when the
/// resolution events fire. Unparseable environment values count as unset;
/// resolution reports them.
pub fn verbose_requested<F>(args: &[String], lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let flag = param_name_to_cla("verbose");
    if args.iter().any(|arg| *arg == flag) {
        return true;
    }
    lookup(&param_name_to_env_var(ENV_PREFIX, "verbose"))
        .and_then(|raw| ParamType::Boolean.parse("verbose", &raw).ok())
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}
