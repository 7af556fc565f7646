use std::{fmt::Display, ops::Deref, path::PathBuf};

/// A configuration value that remembers where it came from.
///
/// The source of every resolved setting is logged at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedProperty<T> {
    /// Value from a command line flag (parsed_value, raw_argument)
    Cli(T, String),
    /// Value from an environment variable (parsed_value, variable_name)
    Env(T, String),
    /// Value from the configuration file (parsed_value, file_path)
    File(T, PathBuf),
    /// Built-in default
    Default(T),
}

impl<T> ParsedProperty<T> {
    /// Get the parsed value
    pub fn value(&self) -> &T {
        match self {
            ParsedProperty::Cli(value, _)
            | ParsedProperty::Env(value, _)
            | ParsedProperty::File(value, _)
            | ParsedProperty::Default(value) => value,
        }
    }

    /// Consume the property and return the parsed value
    pub fn into_value(self) -> T {
        match self {
            ParsedProperty::Cli(value, _)
            | ParsedProperty::Env(value, _)
            | ParsedProperty::File(value, _)
            | ParsedProperty::Default(value) => value,
        }
    }

    /// Get the source name as a string
    pub fn source_name(&self) -> &'static str {
        match self {
            ParsedProperty::Cli(_, _) => "cli",
            ParsedProperty::Env(_, _) => "env",
            ParsedProperty::File(_, _) => "file",
            ParsedProperty::Default(_) => "default",
        }
    }

    /// Describe the source in a form suitable for a startup log line,
    /// e.g. `env DEVOPS_RELAY_PORT` or `file /etc/relay.toml`.
    pub fn origin(&self) -> String {
        match self {
            ParsedProperty::Cli(_, raw) => format!("cli {}", raw),
            ParsedProperty::Env(_, var) => format!("env {}", var),
            ParsedProperty::File(_, path) => format!("file {}", path.display()),
            ParsedProperty::Default(_) => "default".to_string(),
        }
    }

    /// Apply a conversion while keeping the source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParsedProperty<U> {
        match self {
            ParsedProperty::Cli(value, raw) => ParsedProperty::Cli(f(value), raw),
            ParsedProperty::Env(value, var) => ParsedProperty::Env(f(value), var),
            ParsedProperty::File(value, path) => ParsedProperty::File(f(value), path),
            ParsedProperty::Default(value) => ParsedProperty::Default(f(value)),
        }
    }

    /// Apply a fallible conversion while keeping the source.
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<ParsedProperty<U>, E> {
        Ok(match self {
            ParsedProperty::Cli(value, raw) => ParsedProperty::Cli(f(value)?, raw),
            ParsedProperty::Env(value, var) => ParsedProperty::Env(f(value)?, var),
            ParsedProperty::File(value, path) => ParsedProperty::File(f(value)?, path),
            ParsedProperty::Default(value) => ParsedProperty::Default(f(value)?),
        })
    }
}

impl<T> Deref for ParsedProperty<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value()
    }
}

impl<T: Display> Display for ParsedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value().fmt(f)
    }
}

impl<T> From<T> for ParsedProperty<T> {
    fn from(value: T) -> Self {
        ParsedProperty::Default(value)
    }
}
