//! Usage text for the whole program or a single task.
//!
//! Everything printed here is derived from the parameter and task
//! definitions. Rendering is split from output: the `*_lines` methods build
//! the full text first, so a failing `print_task_help` writes nothing.

mod render;

pub use render::{param_detail_lines, params_list, positional_detail_lines, positional_params_list};

use crate::error::{TaskError, TaskResult};
use crate::params::ParamDefinitionsMap;
use crate::tasks::TaskRegistry;

/// Line-oriented output boundary.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

pub struct HelpPrinter<'a> {
    program_name: &'a str,
    version: &'a str,
    global_params: &'a ParamDefinitionsMap,
    tasks: &'a TaskRegistry,
}

impl<'a> HelpPrinter<'a> {
    pub fn new(
        program_name: &'a str,
        version: &'a str,
        global_params: &'a ParamDefinitionsMap,
        tasks: &'a TaskRegistry,
    ) -> Self {
        Self {
            program_name,
            version,
            global_params,
            tasks,
        }
    }

    pub fn print_global_help(&self, out: &mut dyn LineSink, include_internal_tasks: bool) {
        for line in self.global_help_lines(include_internal_tasks) {
            out.write_line(&line);
        }
    }

    /// Fails with [`TaskError::UnrecognizedTask`] before writing anything.
    pub fn print_task_help(&self, out: &mut dyn LineSink, task_name: &str) -> TaskResult<()> {
        for line in self.task_help_lines(task_name)? {
            out.write_line(&line);
        }
        Ok(())
    }

    pub fn global_help_lines(&self, include_internal_tasks: bool) -> Vec<String> {
        let program = self.program_name;
        tracing::debug!(include_internal_tasks, "rendering global help");
        let mut lines = self.header();
        lines.push(format!("Usage: {program} [GLOBAL OPTIONS] <TASK> [TASK OPTIONS]"));
        lines.push(String::new());

        lines.push("GLOBAL OPTIONS:".to_string());
        lines.push(String::new());
        lines.extend(param_detail_lines(self.global_params));

        lines.push(String::new());
        lines.push(String::new());
        lines.push("AVAILABLE TASKS:".to_string());
        lines.push(String::new());
        let shown: Vec<(&str, Option<&str>)> = self
            .tasks
            .iter()
            .filter(|t| include_internal_tasks || !t.is_internal)
            .map(|t| (t.name.as_str(), t.description.as_deref()))
            .collect();
        lines.extend(render::task_list_lines(&shown));
        lines.push(String::new());

        lines.push(format!("For tasks' specific help run: {program} help [task]"));
        lines.push(String::new());
        lines
    }

    pub fn task_help_lines(&self, task_name: &str) -> TaskResult<Vec<String>> {
        let Some(task) = self.tasks.get(task_name) else {
            return Err(TaskError::unrecognized_task(task_name));
        };
        let program = self.program_name;
        tracing::debug!(task = %task.name, "rendering task help");

        let mut lines = self.header();
        lines.push(format!(
            "Usage: {program} [GLOBAL OPTIONS] {}{}{}",
            task.name,
            params_list(&task.param_definitions),
            positional_params_list(&task.positional_param_definitions)
        ));
        lines.push(String::new());

        if !task.param_definitions.is_empty() {
            lines.push("OPTIONS:".to_string());
            lines.push(String::new());
            lines.extend(param_detail_lines(&task.param_definitions));
            lines.push(String::new());
        }

        if !task.positional_param_definitions.is_empty() {
            lines.push("POSITIONAL ARGUMENTS:".to_string());
            lines.push(String::new());
            lines.extend(positional_detail_lines(&task.positional_param_definitions));
            lines.push(String::new());
        }

        lines.push(format!(
            "Help for task {}: {}",
            task.name,
            task.description.as_deref().unwrap_or_default()
        ));
        lines.push(String::new());
        lines.push(format!("For global options help run: {program} help"));
        lines.push(String::new());
        Ok(lines)
    }

    fn header(&self) -> Vec<String> {
        vec![
            format!("{} version {}", self.program_name, self.version),
            String::new(),
        ]
    }
}
