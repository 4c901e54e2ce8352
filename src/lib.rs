//! Declarative task definitions, command line resolution and help rendering.
//!
//! Tasks declare typed named and positional parameters ([`TaskDefinition`]).
//! The same schema drives argument resolution ([`cli_args`]) and the usage
//! text printed by [`HelpPrinter`].

pub mod app;
pub mod builtin_tasks;
pub mod cli_args;
pub mod config;
pub mod error;
pub mod global_params;
pub mod help;
pub mod logging;
pub mod params;
pub mod tasks;
pub mod types;

pub use cli_args::{cla_to_param_name, param_name_to_cla};
pub use error::{TaskError, TaskResult};
pub use help::{HelpPrinter, LineSink, StdoutSink};
pub use params::{ParamDefinition, ParamDefinitionsMap, TaskArguments};
pub use tasks::{TaskDefinition, TaskRegistry};
pub use types::ParamType;
