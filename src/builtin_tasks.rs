use serde_json::json;

use crate::error::TaskResult;
use crate::params::ParamDefinitionsMap;
use crate::tasks::{TaskDefinition, TaskRegistry};
use crate::types::ParamType;

pub const TASK_HELP: &str = "help";
pub const TASK_CHECK: &str = "check";
pub const TASK_CLEAN: &str = "clean";
pub const TASK_COMPILE: &str = "compile";
pub const TASK_COMPILE_GET_SOURCE_PATHS: &str = "compile:get-source-paths";
pub const TASK_FLATTEN: &str = "flatten";
pub const TASK_RUN: &str = "run";
pub const TASK_TEST: &str = "test";

/// Tasks shipped with the binary. Their params may not shadow `globals`.
pub fn builtin_tasks(globals: &ParamDefinitionsMap) -> TaskResult<TaskRegistry> {
    let task = |name: &str| TaskDefinition::new(name).with_globals(globals);

    let help = task(TASK_HELP)
        .with_description("Prints this message")
        .add_optional_positional_param(
            "task",
            Some("An optional task to print more info about"),
            None,
            ParamType::String,
        )?;

    let check = task(TASK_CHECK).with_description("Check whatever you need");

    let clean = task(TASK_CLEAN)
        .with_description("Clears the cache and deletes all artifacts")
        .add_flag("global", Some("Clear the global cache"))?;

    let compile = task(TASK_COMPILE)
        .with_description("Compiles the entire project, building all artifacts")
        .add_flag("force", Some("Force compilation ignoring cache"))?
        .add_flag("quiet", Some("Makes the compilation process less verbose"))?
        .add_optional_param(
            "concurrency",
            Some("Number of compiler jobs to run at once"),
            Some(json!(4)),
            ParamType::Int,
        )?;

    let get_source_paths = TaskDefinition::new_internal(TASK_COMPILE_GET_SOURCE_PATHS)
        .with_globals(globals)
        .with_description("Resolves the project's source paths")
        .add_optional_param(
            "sourcesDir",
            Some("Directory holding the sources"),
            Some(json!("contracts")),
            ParamType::String,
        )?;

    let flatten = task(TASK_FLATTEN)
        .with_description("Flattens and prints sources and their dependencies")
        .add_optional_variadic_positional_param(
            "files",
            Some("The files to flatten"),
            None,
            ParamType::InputFile,
        )?;

    let run = task(TASK_RUN)
        .with_description("Runs a user-defined script after compiling the project")
        .add_positional_param(
            "script",
            Some("A script file to be run"),
            None,
            ParamType::InputFile,
            false,
        )?
        .add_flag("noCompile", Some("Don't compile before running this task"))?;

    let test = task(TASK_TEST)
        .with_description("Runs tests")
        .add_flag("noCompile", Some("Don't compile before running this task"))?
        .add_optional_param(
            "grep",
            Some("Only run tests matching this pattern"),
            None,
            ParamType::String,
        )?
        .add_optional_param(
            "parallel",
            Some("Number of test workers"),
            Some(json!(1)),
            ParamType::Int,
        )?
        .add_optional_param(
            "reporterOptions",
            Some("Options handed to the test reporter"),
            Some(json!({})),
            ParamType::Json,
        )?
        .add_optional_variadic_positional_param(
            "testFiles",
            Some("An optional list of files to test"),
            Some(json!([])),
            ParamType::String,
        )?;

    Ok([help, check, clean, compile, get_source_paths, flatten, run, test]
        .into_iter()
        .collect())
}
