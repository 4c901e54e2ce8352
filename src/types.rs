use serde::Serialize;
use serde_json::{Number, Value};
use std::path::Path;

use crate::error::{TaskError, TaskResult};

/// Semantic type of a task or global parameter.
///
/// Every variant knows how to turn a raw command line token into a typed
/// value and how to check an already-typed value (used for defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamType {
    String,
    Boolean,
    Int,
    Float,
    Json,
    InputFile,
}

impl ParamType {
    /// Uppercase token used as the value placeholder in usage lines.
    pub fn display_token(self) -> &'static str {
        match self {
            ParamType::String => "STRING",
            ParamType::Boolean => "BOOLEAN",
            ParamType::Int => "INT",
            ParamType::Float => "FLOAT",
            ParamType::Json => "JSON",
            ParamType::InputFile => "INPUTFILE",
        }
    }

    pub fn parse(self, arg_name: &str, raw: &str) -> TaskResult<Value> {
        let invalid = || TaskError::invalid_value(arg_name, raw, self.display_token());
        match self {
            ParamType::String => Ok(Value::String(raw.to_string())),
            ParamType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            ParamType::Int => parse_int(raw).map(Value::from).ok_or_else(invalid),
            ParamType::Float => parse_float(raw)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            ParamType::Json => serde_json::from_str::<Value>(raw).map_err(|_| invalid()),
            ParamType::InputFile => {
                let path = Path::new(raw);
                match path.metadata() {
                    Ok(meta) if !meta.is_dir() => Ok(Value::String(raw.to_string())),
                    _ => Err(invalid()),
                }
            }
        }
    }

    /// Shape check for values that did not come from the command line.
    pub fn validate(self, value: &Value) -> bool {
        match self {
            ParamType::String | ParamType::InputFile => value.is_string(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Int => value.as_i64().is_some(),
            ParamType::Float => value.is_number(),
            ParamType::Json => true,
        }
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    if let Some(hex) = raw.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return i64::from_str_radix(hex, 16).ok();
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    if raw.starts_with("0x") {
        return parse_int(raw).map(|v| v as f64);
    }
    let has_digit = raw.bytes().any(|b| b.is_ascii_digit());
    let allowed = raw
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !has_digit || !allowed {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn display_tokens_are_uppercase_serialized_names() {
        for t in [
            ParamType::String,
            ParamType::Boolean,
            ParamType::Int,
            ParamType::Float,
            ParamType::Json,
            ParamType::InputFile,
        ] {
            let name = serde_json::to_value(t).expect("serializable");
            let name = name.as_str().expect("unit variant");
            assert_eq!(t.display_token(), name.to_uppercase());
        }
        assert_eq!(json!(ParamType::InputFile), json!("inputFile"));
    }

    #[test]
    fn int_accepts_decimal_and_hex() {
        assert_eq!(ParamType::Int.parse("n", "42").expect("int"), json!(42));
        assert_eq!(ParamType::Int.parse("n", "-7").expect("neg"), json!(-7));
        assert_eq!(ParamType::Int.parse("n", "0xff").expect("hex"), json!(255));
        assert!(ParamType::Int.parse("n", "4.2").is_err());
        assert!(ParamType::Int.parse("n", "0x").is_err());
        assert!(ParamType::Int.parse("n", "").is_err());
    }

    #[test]
    fn boolean_is_case_insensitive() {
        assert_eq!(ParamType::Boolean.parse("b", "TRUE").expect("bool"), json!(true));
        assert_eq!(ParamType::Boolean.parse("b", "false").expect("bool"), json!(false));
        let err = ParamType::Boolean.parse("b", "yes").expect_err("reject");
        assert_eq!(err, TaskError::invalid_value("b", "yes", "BOOLEAN"));
    }

    #[test]
    fn float_rejects_non_numeric_words() {
        assert_eq!(ParamType::Float.parse("f", "1.5").expect("float"), json!(1.5));
        assert_eq!(ParamType::Float.parse("f", "2e3").expect("exp"), json!(2000.0));
        assert!(ParamType::Float.parse("f", "inf").is_err());
        assert!(ParamType::Float.parse("f", "NaN").is_err());
        assert!(ParamType::Float.parse("f", "1e999").is_err());
    }

    #[test]
    fn json_parses_any_document() {
        assert_eq!(
            ParamType::Json.parse("j", r#"{"a":[1,2]}"#).expect("json"),
            json!({"a": [1, 2]})
        );
        assert!(ParamType::Json.parse("j", "{oops").is_err());
    }

    #[test]
    fn input_file_must_exist_and_not_be_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("input.txt");
        let mut f = std::fs::File::create(&file).expect("create");
        writeln!(f, "hello").expect("write");
        let raw = file.to_string_lossy().to_string();
        assert_eq!(ParamType::InputFile.parse("f", &raw).expect("file"), json!(raw));
        let dir_raw = dir.path().to_string_lossy().to_string();
        assert!(ParamType::InputFile.parse("f", &dir_raw).is_err());
        assert!(ParamType::InputFile.parse("f", "/definitely/not/here").is_err());
    }

    #[test]
    fn validate_checks_value_shape() {
        assert!(ParamType::String.validate(&json!("x")));
        assert!(!ParamType::String.validate(&json!(1)));
        assert!(ParamType::Int.validate(&json!(3)));
        assert!(!ParamType::Int.validate(&json!(3.5)));
        assert!(ParamType::Float.validate(&json!(3)));
        assert!(ParamType::Json.validate(&json!(null)));
        assert!(!ParamType::Boolean.validate(&json!("true")));
    }
}
