#![forbid(unsafe_code)]

//! Target applications and session defaults.
//!
//! The set of POS applications the demo can talk to is fixed at compile time
//! ([`DemoApp`]), each with an immutable [`PosApiInitParam`]. Session
//! defaults ([`SessionConfig`]) are read once at start-up, optionally from
//! environment variables, and never mutated afterwards.

use std::fmt;

use msapos_input::{filter_activation_input, sanitize_amount};

/// Environment variable selecting the target application by name (`MSA`).
const ENV_DEMO_APP: &str = "MSAPOS_DEMO_APP";
/// Environment variable overriding the display currency.
const ENV_CURRENCY: &str = "MSAPOS_CURRENCY";
/// Environment variable overriding the merchant admin passcode.
const ENV_ADMIN_PASSCODE: &str = "MSAPOS_ADMIN_PASSCODE";
/// Environment variable overriding the initial amount (sanitized).
const ENV_DEFAULT_AMOUNT: &str = "MSAPOS_DEFAULT_AMOUNT";
/// Environment variable overriding auto-dismiss (`1/0/true/false`).
const ENV_AUTO_DISMISS: &str = "MSAPOS_AUTO_DISMISS";

/// Connection parameters for a target POS application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosApiInitParam {
    /// Package identifier of the POS application.
    pub package_name: &'static str,
    /// Activation code pre-filled in the activation field.
    pub default_activation_code: &'static str,
}

/// POS applications the demo can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DemoApp {
    /// MineSec SoftPOS, staging build.
    #[default]
    Msa,
}

impl DemoApp {
    /// Every selectable application, in menu order.
    pub const ALL: [DemoApp; 1] = [DemoApp::Msa];

    /// Menu name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Msa => "MSA",
        }
    }

    /// Connection parameters for this application.
    #[must_use]
    pub const fn param(self) -> PosApiInitParam {
        match self {
            Self::Msa => PosApiInitParam {
                package_name: "com.minesec.msa.stage",
                default_activation_code: "767747582904",
            },
        }
    }

    /// Activation code a session starts with, as the activation field
    /// would accept it.
    #[must_use]
    pub fn default_activation_code(self) -> String {
        filter_activation_input(self.param().default_activation_code)
    }

    /// Look up an application by its exact menu name.
    pub fn from_name(name: &str) -> Result<Self, UnknownDemoApp> {
        Self::ALL
            .into_iter()
            .find(|app| app.name() == name)
            .ok_or_else(|| UnknownDemoApp(name.to_owned()))
    }
}

impl fmt::Display for DemoApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A name that matches no [`DemoApp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDemoApp(pub String);

impl fmt::Display for UnknownDemoApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = DemoApp::ALL.iter().map(|app| app.name()).collect();
        write!(
            f,
            "unknown demo app {:?} (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownDemoApp {}

/// Session defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Application selected at start-up.
    pub demo_app: DemoApp,
    /// Currency shown next to the amount; not editable in the session.
    pub currency: String,
    /// Initial merchant admin passcode used for void and refund.
    pub merchant_admin_passcode: String,
    /// Initial amount field content.
    pub default_amount: String,
    /// Whether the POS app should dismiss its result screen on its own.
    pub auto_dismiss_transaction: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            demo_app: DemoApp::Msa,
            currency: "USD".into(),
            merchant_admin_passcode: "123456".into(),
            default_amount: "2".into(),
            auto_dismiss_transaction: true,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `MSAPOS_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through a custom environment lookup (for tests).
    ///
    /// Unparseable values are ignored with a warning; the default stays.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = get_env(ENV_DEMO_APP) {
            match DemoApp::from_name(name.trim()) {
                Ok(app) => config.demo_app = app,
                Err(err) => tracing::warn!(error = %err, "ignoring {ENV_DEMO_APP}"),
            }
        }
        if let Some(currency) = get_env(ENV_CURRENCY)
            && !currency.trim().is_empty()
        {
            config.currency = currency.trim().to_ascii_uppercase();
        }
        if let Some(passcode) = get_env(ENV_ADMIN_PASSCODE) {
            config.merchant_admin_passcode = passcode;
        }
        if let Some(amount) = get_env(ENV_DEFAULT_AMOUNT) {
            config.default_amount = sanitize_amount(&config.default_amount, &amount);
        }
        if let Some(value) = get_env(ENV_AUTO_DISMISS) {
            match parse_bool(&value) {
                Some(flag) => config.auto_dismiss_transaction = flag,
                None => tracing::warn!(value = %value, "ignoring {ENV_AUTO_DISMISS}"),
            }
        }

        tracing::debug!(
            demo_app = %config.demo_app,
            currency = %config.currency,
            auto_dismiss = config.auto_dismiss_transaction,
            "session config loaded"
        );
        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
