#![forbid(unsafe_code)]

//! Drives an [`ExampleSession`] through every demo section.

use std::fmt;
use std::io::{self, Write};

use msapos_session::{
    ExampleSession, PosApi, PosResponse, SessionConfig, SessionError, SimulatedPosApi, UiSection,
};

use crate::cli::Opts;

/// Walkthrough failure.
#[derive(Debug)]
pub enum DemoError {
    Io(io::Error),
    Session(SessionError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "output error: {e}"),
            Self::Session(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Session(e) => Some(e),
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SessionError> for DemoError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

/// Build the session and simulated POS application described by `opts`.
pub fn prepare(
    opts: &Opts,
    config: SessionConfig,
) -> Result<(ExampleSession, SimulatedPosApi), DemoError> {
    let passcode = config.merchant_admin_passcode.clone();
    let currency = config.currency.clone();
    let mut session = ExampleSession::new(config);
    if let Some(name) = &opts.app {
        session.change_demo_app(name)?;
    }
    let api = SimulatedPosApi::new(session.demo_app().param())
        .with_installed(opts.installed)
        .with_admin_passcode(passcode)
        .with_currency(currency);

    if let Some(amount) = &opts.amount {
        session.amount_field().clear();
        type_keys(amount, |c| session.amount_field().insert_char(c));
    }
    if let Some(code) = &opts.activation_code {
        session.activation_code_field().clear();
        type_keys(code, |c| session.activation_code_field().insert_char(c));
    }
    Ok((session, api))
}

/// Feed `text` one keystroke at a time; returns how many were accepted.
fn type_keys(text: &str, mut press: impl FnMut(char) -> bool) -> usize {
    let accepted = text.chars().filter(|&c| press(c)).count();
    tracing::debug!(typed = text.chars().count(), accepted, "keystrokes replayed");
    accepted
}

/// Run every section in screen order, writing the transcript to `out`.
///
/// Sections whose call is refused (the application is not installed) are
/// reported and skipped; the walkthrough itself keeps going.
pub fn run<A, W>(
    session: &mut ExampleSession,
    api: &mut A,
    out: &mut W,
) -> Result<(), DemoError>
where
    A: PosApi + ?Sized,
    W: Write,
{
    let mut printed = 0;
    for section in UiSection::ALL {
        writeln!(out, "{section}")?;
        let outcome = run_section(session, api, section, out)?;
        if let Err(err) = outcome {
            writeln!(out, "  skipped: {err}")?;
        }
        printed = flush_log(session, printed, out)?;
    }
    Ok(())
}

fn run_section<A, W>(
    session: &mut ExampleSession,
    api: &mut A,
    section: UiSection,
    out: &mut W,
) -> Result<Result<(), SessionError>, DemoError>
where
    A: PosApi + ?Sized,
    W: Write,
{
    let result = match section {
        UiSection::CheckInstallation => {
            for line in session.installation_report(&*api).lines() {
                writeln!(out, "  {line}")?;
            }
            return Ok(Ok(()));
        }
        UiSection::WarmUp => session.warm_up(api),
        UiSection::Activation => {
            let display = session.activation_code_display();
            let complete = session.is_activation_code_complete();
            let cursor = session.activation_code_field().display_cursor();
            writeln!(out, "  code: {display} (cursor {cursor}, complete: {complete})")?;
            session.activate(api)
        }
        UiSection::EnquiryApp => session.enquiry_app_status(api),
        UiSection::SaleTran => {
            writeln!(
                out,
                "  amount: {} {} (submits {})",
                session.currency(),
                session.amount_str(),
                session.amount_for_sale()
            )?;
            if session.is_amount_missing() {
                writeln!(out, "  amount is empty")?;
            }
            session.sale(api).and_then(|_| session.auth(api))
        }
        UiSection::EnquiryTran => session.enquiry_transaction(api),
        UiSection::EnquiryTranWithMessageId => session.enquiry_transaction_with_message_id(api),
        UiSection::VoidTran => session.void(api),
        UiSection::Settlement => session.settle(api),
        UiSection::RefundTran => session.refund(api),
        UiSection::ReloadConfiguration => session.reload_configuration(api),
        UiSection::EnquiryBluetoothConnectStatus => session.enquiry_bluetooth_status(api),
    };
    Ok(result.map(|response: PosResponse| {
        tracing::info!(%section, status = response.kind(), "section finished");
    }))
}

/// Print log entries appended since `printed`; returns the new count.
fn flush_log<W: Write>(
    session: &ExampleSession,
    printed: usize,
    out: &mut W,
) -> io::Result<usize> {
    let messages = session.messages();
    for entry in messages.iter().skip(printed) {
        for line in entry.lines() {
            writeln!(out, "  | {line}")?;
        }
    }
    Ok(messages.len())
}
