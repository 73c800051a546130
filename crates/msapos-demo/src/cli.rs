#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo walkthrough.
//!
//! Parses args by hand. Environment variables supply defaults (`MSAPOS_LOG`
//! here, the `MSAPOS_*` session defaults in
//! [`SessionConfig::from_env`](msapos_session::SessionConfig::from_env));
//! explicit flags override them.

use std::fmt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable for the default log filter.
const ENV_LOG: &str = "MSAPOS_LOG";

pub const HELP_TEXT: &str = "\
MSA POS demo walkthrough

USAGE:
    msapos-demo [OPTIONS]

OPTIONS:
    --app=NAME              Target application (default: MSA)
    --amount=AMOUNT         Amount typed into the sale field, one keystroke at a time
    --activation-code=CODE  Activation code typed into the activation field
    --not-installed         Simulate a device without the POS application
    --log-level=FILTER      tracing filter when RUST_LOG is unset (default: warn)
    --help, -h              Show this help message
    --version, -V           Show version

ENVIRONMENT VARIABLES:
    MSAPOS_LOG              Default for --log-level
    MSAPOS_DEMO_APP         Default target application
    MSAPOS_CURRENCY         Currency shown next to the amount
    MSAPOS_ADMIN_PASSCODE   Merchant admin passcode for void and refund
    MSAPOS_DEFAULT_AMOUNT   Initial amount field value
    MSAPOS_AUTO_DISMISS     Auto-dismiss the result screen (1/0/true/false)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Target application name; `None` keeps the configured default.
    pub app: Option<String>,
    /// Amount to type; `None` keeps the configured default.
    pub amount: Option<String>,
    /// Activation code to type; `None` keeps the app's default.
    pub activation_code: Option<String>,
    /// Whether the simulated POS application is installed.
    pub installed: bool,
    /// tracing filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            app: None,
            amount: None,
            activation_code: None,
            installed: true,
            log_level: "warn".into(),
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Command-line error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    UnknownArgument(String),
    EmptyValue(&'static str),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(
                f,
                "Unknown argument: {arg}\nRun with --help for usage information."
            ),
            Self::EmptyValue(flag) => write!(f, "Missing value for {flag}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse process arguments and environment.
    pub fn parse() -> Result<Command, CliError> {
        Self::parse_from(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Parse an explicit argument list with a custom environment lookup.
    pub fn parse_from<I, S, F>(args: I, get_env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env(ENV_LOG)
            && !val.trim().is_empty()
        {
            opts.log_level = val;
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--not-installed" => opts.installed = false,
                other => {
                    if let Some(val) = other.strip_prefix("--app=") {
                        opts.app = Some(non_empty(val, "--app")?);
                    } else if let Some(val) = other.strip_prefix("--amount=") {
                        // An empty amount is meaningful: it clears the field.
                        opts.amount = Some(val.to_owned());
                    } else if let Some(val) = other.strip_prefix("--activation-code=") {
                        opts.activation_code = Some(val.to_owned());
                    } else if let Some(val) = other.strip_prefix("--log-level=") {
                        opts.log_level = non_empty(val, "--log-level")?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_owned()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn non_empty(val: &str, flag: &'static str) -> Result<String, CliError> {
    if val.is_empty() {
        Err(CliError::EmptyValue(flag))
    } else {
        Ok(val.to_owned())
    }
}

/// `msapos-demo <version>`.
#[must_use]
pub fn version_line() -> String {
    format!("msapos-demo {VERSION}")
}
