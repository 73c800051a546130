#![forbid(unsafe_code)]

//! Session layer for the MSA POS demo.
//!
//! This crate sits between the input formatting in `msapos-input` and an
//! external POS application:
//! - [`MessageLog`] - shared, append-only transcript of calls and responses
//! - [`SessionConfig`] / [`DemoApp`] - start-up defaults and target apps
//! - [`PosRequest`] / [`PosResponse`] - what crosses the POS boundary
//! - [`PosApi`] - the boundary itself, with [`SimulatedPosApi`] as a stand-in
//! - [`ExampleSession`] - screen state and the launch/record cycle
//! - [`UiSection`] - the screen's numbered sections
//!
//! # Example
//! ```
//! use msapos_session::{DemoApp, ExampleSession, SessionConfig, SimulatedPosApi};
//!
//! let mut session = ExampleSession::new(SessionConfig::default());
//! let mut api = SimulatedPosApi::new(DemoApp::Msa.param());
//!
//! session.warm_up(&mut api).unwrap();
//! session.activate(&mut api).unwrap();
//! session.handle_input_amount("12.50");
//! let response = session.sale(&mut api).unwrap();
//!
//! assert!(response.is_success());
//! assert_eq!(session.cached_transaction_id(), "T000001");
//! assert_eq!(session.messages()[0], "==> Launch - WarmUp");
//! ```

pub mod api;
pub mod config;
pub mod message_log;
pub mod request;
pub mod response;
pub mod section;
pub mod session;

pub use api::{PosApi, SimulatedPosApi};
pub use config::{DemoApp, PosApiInitParam, SessionConfig, UnknownDemoApp};
pub use message_log::{ENTRY_MARKER, MessageLog};
pub use request::PosRequest;
pub use response::{PosFailure, PosResponse, TRAN_ID_KEY};
pub use section::UiSection;
pub use session::{ExampleSession, SessionError};
