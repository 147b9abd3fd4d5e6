//! Command line assembly for generator runs.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::GenerateError;
use crate::task::GenerateTask;

/// Option naming the generation directory.
pub const OPTION_GEN_DIR: &str = "genDir";
/// Option naming the model search path.
pub const OPTION_MODELPATH: &str = "modelpath";
/// Option asking for the generation directory to be emptied first.
pub const OPTION_CLEAN: &str = "clean";
/// Option selecting the generator's log level.
pub const OPTION_LOGLEVEL: &str = "loglevel";

/// Value of a generator option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    /// `true` passes the bare flag, `false` leaves it out.
    Flag(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// Any other value, passed verbatim.
    Text(String),
}

impl OptionValue {
    /// Parses a value given on the command line.
    pub fn parse(value: &str) -> Self {
        match value {
            "true" => Self::Flag(true),
            "false" => Self::Flag(false),
            _ => value
                .parse::<serde_json::Number>()
                .map(Self::Number)
                .unwrap_or_else(|_| Self::Text(value.to_string())),
        }
    }

    /// Returns true if this is an enabled flag.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Flag(true))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Assembles the generator arguments for a task.
///
/// The order is `-genDir`, `-modelpath` (only if the task has one), the
/// options in key order and finally the model sources.
pub fn collect_arguments(task: &GenerateTask) -> Result<Vec<String>, GenerateError> {
    let mut args = Vec::new();

    add_argument(
        &mut args,
        OPTION_GEN_DIR,
        &OptionValue::Text(absolute(&task.gen_dir)?.display().to_string()),
    );

    if !task.modelpath.is_empty() {
        let paths = task
            .modelpath
            .iter()
            .map(|path| absolute(path))
            .collect::<Result<Vec<PathBuf>, GenerateError>>()?;
        let joined = std::env::join_paths(paths)
            .map_err(|e| GenerateError::config(format!("Invalid modelpath: {}", e)))?;
        add_argument(
            &mut args,
            OPTION_MODELPATH,
            &OptionValue::Text(joined.to_string_lossy().into_owned()),
        );
    }

    for (key, value) in &task.options {
        add_argument(&mut args, key, value);
    }

    args.extend(
        task.sources
            .iter()
            .map(|source| source.display().to_string()),
    );

    Ok(args)
}

fn add_argument(args: &mut Vec<String>, key: &str, value: &OptionValue) {
    let option = format!("-{}", key);
    match value {
        OptionValue::Flag(true) => args.push(option),
        OptionValue::Flag(false) => {}
        other => {
            args.push(option);
            args.push(other.to_string());
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, GenerateError> {
    std::path::absolute(path).map_err(|e| {
        GenerateError::config(format!("Cannot make {} absolute: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_cache::ResourceSet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(gen_dir: &str) -> GenerateTask {
        GenerateTask::new("c", ResourceSet::new(), gen_dir)
    }

    #[rstest]
    #[case("true", OptionValue::Flag(true))]
    #[case("false", OptionValue::Flag(false))]
    #[case("3", OptionValue::Number(3.into()))]
    #[case("debug", OptionValue::Text("debug".to_string()))]
    #[case("", OptionValue::Text(String::new()))]
    fn test_option_value_parse(#[case] input: &str, #[case] expected: OptionValue) {
        assert_eq!(OptionValue::parse(input), expected);
    }

    #[test]
    fn test_option_value_deserialize() {
        let values: Vec<OptionValue> = serde_json::from_str(r#"[true, 2, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                OptionValue::Flag(true),
                OptionValue::Number(2.into()),
                OptionValue::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_gen_dir_only() {
        let args = collect_arguments(&task("/out")).unwrap();
        assert_eq!(args, vec!["-genDir", "/out"]);
    }

    #[test]
    fn test_gen_dir_is_made_absolute() {
        let args = collect_arguments(&task("out")).unwrap();
        let expected = std::env::current_dir().unwrap().join("out");
        assert_eq!(args[1], expected.display().to_string());
    }

    #[test]
    fn test_full_argument_order() {
        let task = task("/out")
            .with_modelpath(vec![PathBuf::from("/m1"), PathBuf::from("/m2")])
            .with_option("clean", true)
            .with_option("loglevel", "debug")
            .with_option("noexit", false)
            .with_sources(vec![PathBuf::from("/models/a.room"), PathBuf::from("/models/b.room")]);

        let args = collect_arguments(&task).unwrap();
        let modelpath = std::env::join_paths(["/m1", "/m2"]).unwrap();

        assert_eq!(
            args,
            vec![
                "-genDir".to_string(),
                "/out".to_string(),
                "-modelpath".to_string(),
                modelpath.to_string_lossy().into_owned(),
                "-clean".to_string(),
                "-loglevel".to_string(),
                "debug".to_string(),
                "/models/a.room".to_string(),
                "/models/b.room".to_string(),
            ]
        );
    }

    #[test]
    fn test_numeric_option() {
        let task = task("/out").with_option("threads", OptionValue::Number(4.into()));
        let args = collect_arguments(&task).unwrap();
        assert_eq!(args, vec!["-genDir", "/out", "-threads", "4"]);
    }

    #[test]
    fn test_empty_modelpath_is_omitted() {
        let args = collect_arguments(&task("/out").with_modelpath(Vec::new())).unwrap();
        assert!(!args.contains(&"-modelpath".to_string()));
    }
}
