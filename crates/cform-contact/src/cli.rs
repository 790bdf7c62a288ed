#![forbid(unsafe_code)]

//! Command-line argument parsing for the `cform` binary.
//!
//! Parses args manually. Flags override `CFORM_*` environment variables,
//! which override the config file.

use std::fmt;
use std::path::PathBuf;
use std::process;

use crate::config::{ConfigError, ContactFormConfig, parse_min_len};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Disables mouse capture when set to a non-empty value.
pub const ENV_NO_MOUSE: &str = "CFORM_NO_MOUSE";

const HELP_TEXT: &str = "\
cform: terminal contact form with live validation

USAGE:
    cform [OPTIONS]

OPTIONS:
    --config=FILE          JSON config file
    --min-first-name=N     Minimum first-name length (default: 5)
    --keep-values          Keep inputs after a successful submit
    --print-json           Print the last submission as JSON on exit
    --no-mouse             Disable mouse event capture
    --help, -h             Show this help message
    --version, -V          Show version

KEYBINDINGS:
    Tab / Shift-Tab        Move between fields and the Submit button
    Enter                  Submit (newline inside Message)
    Esc / Ctrl+C           Quit

ENVIRONMENT VARIABLES:
    CFORM_CONFIG           Config file, if --config is not given
    CFORM_MIN_FIRST_NAME   Override first_name_min_len
    CFORM_KEEP_VALUES      1 to keep inputs after submit
    CFORM_NO_MOUSE         Disable mouse capture
    CFORM_LOG              Log filter (default: info)
    CFORM_LOG_FILE         Log file path (default: cform.log in the temp dir)
    CFORM_LOG_JSON         Write logs as JSON lines";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub config: Option<PathBuf>,
    pub min_first_name: Option<usize>,
    pub keep_values: bool,
    pub print_json: bool,
    /// Whether mouse events are enabled.
    pub mouse: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            config: None,
            min_first_name: None,
            keep_values: false,
            print_json: false,
            mouse: true,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Opts),
    Help,
    Version,
}

#[derive(Debug)]
pub enum CliError {
    Unknown(String),
    Invalid(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(arg) => write!(
                f,
                "Unknown argument: {arg}\nRun with --help for usage information."
            ),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unknown(_) => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl Opts {
    /// Parse the process arguments, exiting on `--help`, `--version`, or
    /// bad input.
    pub fn parse() -> Self {
        let args = std::env::args().skip(1);
        match Self::parse_from(args, |key| std::env::var(key).ok()) {
            Ok(Action::Run(opts)) => opts,
            Ok(Action::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Action::Version) => {
                println!("cform {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        }
    }

    /// Parse `args` (without the program name), reading env through `var`.
    pub fn parse_from<I, F>(args: I, var: F) -> Result<Action, CliError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if var(ENV_NO_MOUSE).is_some_and(|v| !v.is_empty()) {
            opts.mouse = false;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Action::Help),
                "--version" | "-V" => return Ok(Action::Version),
                "--no-mouse" => opts.mouse = false,
                "--keep-values" => opts.keep_values = true,
                "--print-json" => opts.print_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--config=") {
                        opts.config = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--min-first-name=") {
                        let n = parse_min_len("--min-first-name", val)
                            .map_err(CliError::Invalid)?;
                        opts.min_first_name = Some(n);
                    } else {
                        return Err(CliError::Unknown(other.to_string()));
                    }
                }
            }
        }
        Ok(Action::Run(opts))
    }

    /// Build the form config: file and env layers, then these flags.
    pub fn to_config<F>(&self, var: F) -> Result<ContactFormConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ContactFormConfig::load(self.config.as_deref(), var)?;
        if let Some(n) = self.min_first_name {
            config.first_name_min_len = n;
        }
        if self.keep_values {
            config.clear_on_submit = false;
        }
        Ok(config)
    }
}
