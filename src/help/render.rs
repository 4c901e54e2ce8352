use crate::cli_args::param_name_to_cla;
use crate::params::{ParamDefinition, ParamDefinitionsMap};

fn value_placeholder(def: &ParamDefinition) -> String {
    format!("<{}>", def.param_type.display_token())
}

fn column_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn detail_line(label: &str, width: usize, def: &ParamDefinition) -> String {
    let mut line = format!("  {label:<width$}\t");
    if let Some(description) = &def.description {
        line.push_str(description);
        line.push(' ');
    }
    if let Some(annotation) = def.default_annotation() {
        line.push_str(&annotation);
    }
    line
}

/// Usage fragment for named params, e.g. ` [--runs <INT>] --network <STRING>`.
pub fn params_list(defs: &ParamDefinitionsMap) -> String {
    let mut out = String::new();
    for (name, def) in defs {
        let bracketed = def.default_value.is_some();
        out.push(' ');
        if bracketed {
            out.push('[');
        }
        out.push_str(&param_name_to_cla(name));
        if !def.is_flag {
            out.push(' ');
            out.push_str(&value_placeholder(def));
        }
        if bracketed {
            out.push(']');
        }
    }
    out
}

/// Usage fragment for positional params in declared order, e.g. ` src [...rest]`.
pub fn positional_params_list(defs: &[ParamDefinition]) -> String {
    let mut out = String::new();
    for def in defs {
        let bracketed = def.default_value.is_some();
        out.push(' ');
        if bracketed {
            out.push('[');
        }
        if def.is_variadic {
            out.push_str("...");
        }
        out.push_str(&def.name);
        if bracketed {
            out.push(']');
        }
    }
    out
}

pub fn param_detail_lines(defs: &ParamDefinitionsMap) -> Vec<String> {
    let flags: Vec<(String, &ParamDefinition)> = defs
        .iter()
        .map(|(name, def)| (param_name_to_cla(name), def))
        .collect();
    let width = column_width(flags.iter().map(|(flag, _)| flag.as_str()));
    flags
        .iter()
        .map(|(flag, def)| detail_line(flag, width, def))
        .collect()
}

/// Positional names are shown bare, not as `--flags`.
pub fn positional_detail_lines(defs: &[ParamDefinition]) -> Vec<String> {
    let width = column_width(defs.iter().map(|d| d.name.as_str()));
    defs.iter()
        .map(|def| detail_line(&def.name, width, def))
        .collect()
}

pub fn task_list_lines(tasks: &[(&str, Option<&str>)]) -> Vec<String> {
    let width = column_width(tasks.iter().map(|(name, _)| *name));
    tasks
        .iter()
        .map(|(name, description)| {
            format!("  {name:<width$}\t{}", description.unwrap_or_default())
        })
        .collect()
}
