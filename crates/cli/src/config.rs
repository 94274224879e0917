#![forbid(unsafe_code)]

use std::path::PathBuf;

pub(crate) const DEFAULT_STORAGE_DIR: &str = ".catalog";
pub(crate) const DEFAULT_LOG_FILTER: &str = "info";

const STORAGE_DIR_ENV: &str = "CATALOG_STORAGE_DIR";
const LOG_ENV: &str = "CATALOG_LOG";
const IN_MEMORY_ENV: &str = "CATALOG_IN_MEMORY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CliConfig {
    pub(crate) storage_dir: PathBuf,
    pub(crate) log_filter: String,
    pub(crate) in_memory: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CliAction {
    Help,
    Version,
    Run(CliConfig),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ConfigError {
    MissingValue(&'static str),
    UnknownArgument(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue(flag) => write!(f, "{flag} requires a value"),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg} (see --help)"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Flags win over environment variables, which win over defaults.
/// `env` is the variable lookup (`std::env::var` in the binary).
pub(crate) fn parse_args<I, F>(args: I, env: F) -> Result<CliAction, ConfigError>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut storage_dir: Option<PathBuf> = None;
    let mut log_filter: Option<String> = None;
    let mut in_memory = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "--storage-dir" => {
                let value = args.next().ok_or(ConfigError::MissingValue("--storage-dir"))?;
                storage_dir = Some(PathBuf::from(value));
            }
            "--log" => {
                log_filter = Some(args.next().ok_or(ConfigError::MissingValue("--log"))?);
            }
            "--in-memory" => in_memory = true,
            other => return Err(ConfigError::UnknownArgument(other.to_string())),
        }
    }

    let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let storage_dir = storage_dir
        .or_else(|| non_empty(STORAGE_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
    let log_filter = log_filter
        .or_else(|| non_empty(LOG_ENV))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let in_memory = in_memory || non_empty(IN_MEMORY_ENV).is_some_and(|value| is_truthy(&value));

    Ok(CliAction::Run(CliConfig {
        storage_dir,
        log_filter,
        in_memory,
    }))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn run_config(action: CliAction) -> CliConfig {
        match action {
            CliAction::Run(config) => config,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = run_config(parse_args(Vec::new(), |_| None).expect("parse"));
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(!config.in_memory);
    }

    #[test]
    fn flags_override_environment() {
        let env: HashMap<&str, &str> = HashMap::from([
            (STORAGE_DIR_ENV, "/from/env"),
            (LOG_ENV, "warn"),
            (IN_MEMORY_ENV, "0"),
        ]);
        let lookup = |key: &str| env.get(key).map(|value| value.to_string());

        let config = run_config(
            parse_args(
                args(&["--storage-dir", "/from/flag", "--log", "catalog_storage=debug"]),
                lookup,
            )
            .expect("parse"),
        );
        assert_eq!(config.storage_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.log_filter, "catalog_storage=debug");
        assert!(!config.in_memory);

        let config = run_config(parse_args(Vec::new(), lookup).expect("parse"));
        assert_eq!(config.storage_dir, PathBuf::from("/from/env"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn in_memory_comes_from_flag_or_truthy_env() {
        let config = run_config(parse_args(args(&["--in-memory"]), |_| None).expect("parse"));
        assert!(config.in_memory);

        let config = run_config(
            parse_args(Vec::new(), |key| {
                (key == IN_MEMORY_ENV).then(|| "Yes".to_string())
            })
            .expect("parse"),
        );
        assert!(config.in_memory);
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            parse_args(args(&["--bogus-later", "-h"]), |_| None),
            Err(ConfigError::UnknownArgument("--bogus-later".to_string()))
        );
        assert_eq!(
            parse_args(args(&["--help", "--bogus"]), |_| None),
            Ok(CliAction::Help)
        );
        assert_eq!(parse_args(args(&["-V"]), |_| None), Ok(CliAction::Version));
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        assert_eq!(
            parse_args(args(&["--storage-dir"]), |_| None),
            Err(ConfigError::MissingValue("--storage-dir"))
        );
        assert_eq!(
            parse_args(args(&["--log"]), |_| None),
            Err(ConfigError::MissingValue("--log"))
        );
    }
}
