//! Command line resolution against parameter schemas.
//!
//! Raw tokens are split in two passes: global parameters and the task name
//! first ([`parse_global_arguments`]), then the chosen task's own named and
//! positional parameters ([`parse_task_arguments`]).

use serde_json::Value;

use crate::error::{TaskError, TaskResult};
use crate::params::{ParamDefinition, ParamDefinitionsMap, TaskArguments};
use crate::tasks::TaskDefinition;

const CLA_PREFIX: &str = "--";

/// `showStackTraces` -> `--show-stack-traces`.
pub fn param_name_to_cla(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    out.push_str(CLA_PREFIX);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `--show-stack-traces` -> `showStackTraces`.
pub fn cla_to_param_name(cla: &str) -> TaskResult<String> {
    if cla.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(TaskError::InvalidArgumentCasing {
            argument: cla.to_string(),
        });
    }
    let bare = cla.strip_prefix(CLA_PREFIX).unwrap_or(cla);
    let mut out = String::with_capacity(bare.len());
    for (i, part) in bare.split('-').enumerate() {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if i > 0 => {
                out.push(first.to_ascii_uppercase());
                out.extend(chars);
            }
            _ => out.push_str(part),
        }
    }
    Ok(out)
}

/// `showStackTraces` with prefix `TASKRS` -> `TASKRS_SHOW_STACK_TRACES`.
pub fn param_name_to_env_var(prefix: &str, name: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + name.len() + 4);
    out.push_str(prefix);
    out.push('_');
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn has_cla_format(arg: &str) -> bool {
    arg.starts_with(CLA_PREFIX)
}

fn is_cla_param_name(arg: &str, defs: &ParamDefinitionsMap) -> bool {
    has_cla_format(arg)
        && cla_to_param_name(arg)
            .map(|name| defs.contains_key(&name))
            .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedGlobal {
    pub global_arguments: TaskArguments,
    pub task_name: Option<String>,
    pub unparsed_task_args: Vec<String>,
}

impl ParsedGlobal {
    pub fn flag(&self, name: &str) -> bool {
        self.global_arguments
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Pulls global parameters and the task name out of `raw`.
///
/// Before the task name every `--` token must be a global parameter. After
/// it, global parameters are still consumed and everything else is left for
/// the task. Command line values win over `env_arguments`, which already
/// carry the global defaults.
pub fn parse_global_arguments(
    global_defs: &ParamDefinitionsMap,
    env_arguments: &TaskArguments,
    raw: &[String],
) -> TaskResult<ParsedGlobal> {
    let mut parsed = TaskArguments::new();
    let mut task_name: Option<String> = None;
    let mut unparsed = Vec::new();
    let mut i = 0usize;
    while i < raw.len() {
        let arg = raw[i].as_str();
        if task_name.is_none() {
            if !has_cla_format(arg) {
                task_name = Some(arg.to_string());
                i += 1;
                continue;
            }
            if !is_cla_param_name(arg, global_defs) {
                cla_to_param_name(arg)?;
                return Err(TaskError::UnrecognizedCommandLineArg {
                    argument: arg.to_string(),
                });
            }
        } else if !is_cla_param_name(arg, global_defs) {
            unparsed.push(arg.to_string());
            i += 1;
            continue;
        }
        i = parse_argument_at(raw, i, global_defs, &mut parsed)? + 1;
    }

    let mut global_arguments = env_arguments.clone();
    global_arguments.extend(parsed);
    tracing::debug!(
        task = task_name.as_deref().unwrap_or("<none>"),
        unparsed = unparsed.len(),
        "resolved global arguments"
    );
    Ok(ParsedGlobal {
        global_arguments,
        task_name,
        unparsed_task_args: unparsed,
    })
}

/// Resolves `raw` against `task`'s named and positional parameters.
pub fn parse_task_arguments(task: &TaskDefinition, raw: &[String]) -> TaskResult<TaskArguments> {
    let mut arguments = TaskArguments::new();
    let mut raw_positionals: Vec<&str> = Vec::new();
    let mut i = 0usize;
    while i < raw.len() {
        let arg = raw[i].as_str();
        if !has_cla_format(arg) {
            raw_positionals.push(arg);
            i += 1;
            continue;
        }
        if !is_cla_param_name(arg, &task.param_definitions) {
            cla_to_param_name(arg)?;
            return Err(TaskError::UnrecognizedParamName {
                argument: arg.to_string(),
            });
        }
        i = parse_argument_at(raw, i, &task.param_definitions, &mut arguments)? + 1;
    }

    add_default_arguments(&task.param_definitions, &mut arguments)?;
    parse_positional_arguments(
        &task.positional_param_definitions,
        &raw_positionals,
        &mut arguments,
    )?;
    tracing::debug!(task = %task.name, count = arguments.len(), "resolved task arguments");
    Ok(arguments)
}

/// Parses the param at `raw[index]` and returns the index of the last token it used.
fn parse_argument_at(
    raw: &[String],
    index: usize,
    defs: &ParamDefinitionsMap,
    parsed: &mut TaskArguments,
) -> TaskResult<usize> {
    let cla = raw[index].as_str();
    let name = cla_to_param_name(cla)?;
    let Some(def) = defs.get(&name) else {
        return Err(TaskError::UnrecognizedParamName {
            argument: cla.to_string(),
        });
    };
    if parsed.contains_key(&name) {
        return Err(TaskError::RepeatedParam {
            argument: cla.to_string(),
        });
    }
    if def.is_flag {
        parsed.insert(name, Value::Bool(true));
        return Ok(index);
    }
    let Some(raw_value) = raw.get(index + 1) else {
        return Err(TaskError::MissingTaskArgument {
            argument: cla.to_string(),
        });
    };
    let value = def.param_type.parse(&name, raw_value)?;
    parsed.insert(name, value);
    Ok(index + 1)
}

fn add_default_arguments(
    defs: &ParamDefinitionsMap,
    arguments: &mut TaskArguments,
) -> TaskResult<()> {
    for (name, def) in defs {
        if arguments.contains_key(name) {
            continue;
        }
        if !def.is_optional {
            return Err(TaskError::MissingTaskArgument {
                argument: param_name_to_cla(name),
            });
        }
        if let Some(default) = &def.default_value {
            arguments.insert(name.clone(), default.clone());
        }
    }
    Ok(())
}

fn parse_positional_arguments(
    defs: &[ParamDefinition],
    raw: &[&str],
    arguments: &mut TaskArguments,
) -> TaskResult<()> {
    for (i, def) in defs.iter().enumerate() {
        let value = if i >= raw.len() {
            if !def.is_optional {
                return Err(TaskError::MissingPositionalArg {
                    name: def.name.clone(),
                });
            }
            def.default_value.clone()
        } else if def.is_variadic {
            let values = raw[i..]
                .iter()
                .map(|r| def.param_type.parse(&def.name, r))
                .collect::<TaskResult<Vec<Value>>>()?;
            Some(Value::Array(values))
        } else {
            Some(def.param_type.parse(&def.name, raw[i])?)
        };
        if let Some(value) = value {
            arguments.insert(def.name.clone(), value);
        }
    }

    let takes_rest = defs.last().is_some_and(|d| d.is_variadic);
    if !takes_rest && raw.len() > defs.len() {
        return Err(TaskError::UnrecognizedPositionalArg {
            argument: raw[defs.len()].to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamType;
    use serde_json::json;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn globals() -> ParamDefinitionsMap {
        let mut defs = ParamDefinitionsMap::new();
        defs.insert("verbose".into(), ParamDefinition::flag("verbose"));
        defs.insert(
            "config".into(),
            ParamDefinition::new("config", ParamType::String).optional(None),
        );
        defs
    }

    fn run_task() -> TaskDefinition {
        TaskDefinition::new("run")
            .add_param("network", None, None, ParamType::String, false)
            .and_then(|t| t.add_optional_param("runs", None, Some(json!(1)), ParamType::Int))
            .and_then(|t| t.add_flag("noCompile", None))
            .and_then(|t| t.add_positional_param("script", None, None, ParamType::String, false))
            .and_then(|t| {
                t.add_optional_variadic_positional_param(
                    "scriptArgs",
                    None,
                    Some(json!([])),
                    ParamType::String,
                )
            })
            .expect("valid schema")
    }

    #[test]
    fn name_formatter_round_trips() {
        for (name, cla) in [
            ("verbose", "--verbose"),
            ("showStackTraces", "--show-stack-traces"),
            ("maxFeePerGas", "--max-fee-per-gas"),
            ("v2Api", "--v2-api"),
        ] {
            assert_eq!(param_name_to_cla(name), cla);
            assert_eq!(cla_to_param_name(cla).expect("valid cla"), name);
        }
        assert!(matches!(
            cla_to_param_name("--showStackTraces"),
            Err(TaskError::InvalidArgumentCasing { .. })
        ));
    }

    #[test]
    fn env_var_names_are_upper_snake() {
        assert_eq!(
            param_name_to_env_var("TASKRS", "showStackTraces"),
            "TASKRS_SHOW_STACK_TRACES"
        );
        assert_eq!(param_name_to_env_var("TASKRS", "config"), "TASKRS_CONFIG");
    }

    #[test]
    fn globals_before_and_after_task_name() {
        let mut env = TaskArguments::new();
        env.insert("verbose".into(), json!(false));
        let parsed = parse_global_arguments(
            &globals(),
            &env,
            &args(&["--config", "a.json", "run", "--verbose", "--network", "dev", "x"]),
        )
        .expect("parse");
        assert_eq!(parsed.task_name.as_deref(), Some("run"));
        assert_eq!(parsed.global_arguments["config"], json!("a.json"));
        assert!(parsed.flag("verbose"));
        assert_eq!(parsed.unparsed_task_args, args(&["--network", "dev", "x"]));
    }

    #[test]
    fn unknown_global_before_task_is_rejected() {
        let err = parse_global_arguments(&globals(), &TaskArguments::new(), &args(&["--nope"]))
            .expect_err("reject");
        assert_eq!(
            err,
            TaskError::UnrecognizedCommandLineArg {
                argument: "--nope".into()
            }
        );
        let err = parse_global_arguments(&globals(), &TaskArguments::new(), &args(&["--Verbose"]))
            .expect_err("reject casing");
        assert!(matches!(err, TaskError::InvalidArgumentCasing { .. }));
    }

    #[test]
    fn repeated_global_is_rejected() {
        let err = parse_global_arguments(
            &globals(),
            &TaskArguments::new(),
            &args(&["--verbose", "run", "--verbose"]),
        )
        .expect_err("repeated");
        assert!(matches!(err, TaskError::RepeatedParam { .. }));
    }

    #[test]
    fn task_arguments_with_defaults_and_variadic_rest() {
        let resolved = parse_task_arguments(
            &run_task(),
            &args(&["--network", "dev", "main.js", "a", "b"]),
        )
        .expect("parse");
        assert_eq!(resolved["network"], json!("dev"));
        assert_eq!(resolved["runs"], json!(1));
        assert_eq!(resolved["noCompile"], json!(false));
        assert_eq!(resolved["script"], json!("main.js"));
        assert_eq!(resolved["scriptArgs"], json!(["a", "b"]));

        let resolved = parse_task_arguments(
            &run_task(),
            &args(&["main.js", "--no-compile", "--runs", "0x10", "--network", "dev"]),
        )
        .expect("parse");
        assert_eq!(resolved["noCompile"], json!(true));
        assert_eq!(resolved["runs"], json!(16));
        assert_eq!(resolved["scriptArgs"], json!([]));
    }

    #[test]
    fn task_argument_errors() {
        let task = run_task();
        assert_eq!(
            parse_task_arguments(&task, &args(&["main.js"])).expect_err("missing"),
            TaskError::MissingTaskArgument {
                argument: "--network".into()
            }
        );
        assert_eq!(
            parse_task_arguments(&task, &args(&["--network"])).expect_err("no value"),
            TaskError::MissingTaskArgument {
                argument: "--network".into()
            }
        );
        assert_eq!(
            parse_task_arguments(&task, &args(&["--network", "a"])).expect_err("positional"),
            TaskError::MissingPositionalArg {
                name: "script".into()
            }
        );
        assert!(matches!(
            parse_task_arguments(&task, &args(&["--network", "a", "--bogus", "s"])),
            Err(TaskError::UnrecognizedParamName { .. })
        ));
        assert!(matches!(
            parse_task_arguments(&task, &args(&["--network", "a", "--network", "b", "s"])),
            Err(TaskError::RepeatedParam { .. })
        ));
        assert!(matches!(
            parse_task_arguments(&task, &args(&["--network", "a", "--runs", "many", "s"])),
            Err(TaskError::InvalidArgumentValue { expected: "INT", .. })
        ));
    }

    #[test]
    fn extra_positional_without_variadic_is_rejected() {
        let task = TaskDefinition::new("flatten")
            .add_optional_positional_param("file", None, None, ParamType::String)
            .expect("valid");
        assert_eq!(
            parse_task_arguments(&task, &args(&["a", "b"])).expect_err("extra"),
            TaskError::UnrecognizedPositionalArg {
                argument: "b".into()
            }
        );
        let resolved = parse_task_arguments(&task, &[]).expect("empty");
        assert!(resolved.is_empty());
    }
}
