use serde_json::{Value, json};
use std::env;

use crate::builtin_tasks::{TASK_HELP, builtin_tasks};
use crate::cli_args::{ParsedGlobal, parse_global_arguments, parse_task_arguments};
use crate::config::{APP_VERSION, AppConfig, app_config};
use crate::error::{TaskError, TaskResult};
use crate::global_params::{builtin_global_params, env_global_arguments, verbose_requested};
use crate::help::{HelpPrinter, LineSink, StdoutSink};
use crate::logging::init_logging;
use crate::params::{ParamDefinitionsMap, TaskArguments};
use crate::tasks::{TaskDefinition, TaskRegistry};


/// Everything a command needs: configuration plus the read-only schemas.
pub struct AppCtx<'a> {
    pub config: &'a AppConfig,
    pub globals: ParamDefinitionsMap,
    pub tasks: TaskRegistry,
}

impl<'a> AppCtx<'a> {
    pub fn with_builtins(config: &'a AppConfig) -> TaskResult<Self> {
        let globals = builtin_global_params();
        let tasks = builtin_tasks(&globals)?;
        Ok(Self {
            config,
            globals,
            tasks,
        })
    }

    fn help_printer(&self) -> HelpPrinter<'_> {
        HelpPrinter::new(
            &self.config.program_name,
            APP_VERSION,
            &self.globals,
            &self.tasks,
        )
    }
}

pub fn run() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    run_with(app_config(), &args, |key| env::var(key).ok(), &mut StdoutSink)
}

/// Resolves `args` and writes the result to `out`; returns the exit code.
pub fn run_with(
    config: &AppConfig,
    args: &[String],
    env_lookup: impl Fn(&str) -> Option<String>,
    out: &mut dyn LineSink,
) -> i32 {
    init_logging(&config.log_filter, verbose_requested(args, &env_lookup));
    let ctx = match AppCtx::with_builtins(config) {
        Ok(ctx) => ctx,
        Err(e) => return report_error(config, &e, false),
    };
    let parsed = match env_global_arguments(&ctx.globals, &env_lookup)
        .and_then(|env_args| parse_global_arguments(&ctx.globals, &env_args, args))
    {
        Ok(parsed) => parsed,
        Err(e) => return report_error(config, &e, false),
    };

    match dispatch(&ctx, &parsed, out) {
        Ok(code) => code,
        Err(e) => report_error(config, &e, parsed.flag("showStackTraces")),
    }
}

fn dispatch(ctx: &AppCtx<'_>, parsed: &ParsedGlobal, out: &mut dyn LineSink) -> TaskResult<i32> {
    if parsed.flag("version") {
        out.write_line(APP_VERSION);
        return Ok(0);
    }
    let printer = ctx.help_printer();
    let task_name = parsed.task_name.as_deref().unwrap_or(TASK_HELP);
    if parsed.flag("help") && task_name != TASK_HELP {
        printer.print_task_help(out, task_name)?;
        return Ok(0);
    }

    let Some(task) = ctx.tasks.get(task_name) else {
        return Err(TaskError::unrecognized_task(task_name));
    };
    let task_args = parse_task_arguments(task, &parsed.unparsed_task_args)?;
    tracing::info!(task = %task.name, "task resolved");

    if task.name == TASK_HELP {
        match task_args.get("task").and_then(Value::as_str) {
            Some(name) => printer.print_task_help(out, name)?,
            None => printer.print_global_help(out, ctx.config.show_internal_tasks),
        }
        return Ok(0);
    }
    print_resolved(out, task, &parsed.global_arguments, &task_args);
    Ok(0)
}

/// Task execution lives outside this crate; the resolved invocation is the output.
fn print_resolved(
    out: &mut dyn LineSink,
    task: &TaskDefinition,
    global_arguments: &TaskArguments,
    task_arguments: &TaskArguments,
) {
    let report = json!({
        "task": task.name,
        "definition": task,
        "globalArguments": global_arguments,
        "taskArguments": task_arguments,
    });
    let text = serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string());
    for line in text.lines() {
        out.write_line(line);
    }
}

fn report_error(config: &AppConfig, err: &TaskError, show_stack_traces: bool) -> i32 {
    eprintln!("Error: {err}");
    if show_stack_traces {
        eprintln!("{err:#?}");
    } else {
        eprintln!(
            "For more info run {} with --show-stack-traces",
            config.program_name
        );
    }
    1
}
