#![forbid(unsafe_code)]

//! Scripted walkthrough of the MSA POS demo screen.
//!
//! The binary visits every [`UiSection`](msapos_session::UiSection) in
//! order, types the configured amount and activation code keystroke by
//! keystroke, launches each call against a
//! [`SimulatedPosApi`](msapos_session::SimulatedPosApi) and prints the
//! message log as it grows.

pub mod cli;
pub mod walkthrough;
