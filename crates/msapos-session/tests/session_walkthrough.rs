//! End-to-end walk through every demo section against the simulated POS app.
//!
//! ```sh
//! cargo test -p msapos-session --test session_walkthrough
//! ```

use msapos_session::{
    DemoApp, ExampleSession, PosResponse, SessionConfig, SessionError, SimulatedPosApi, UiSection,
};

fn setup() -> (ExampleSession, SimulatedPosApi) {
    (
        ExampleSession::new(SessionConfig::default()),
        SimulatedPosApi::new(DemoApp::Msa.param()),
    )
}

fn failure_code(response: &PosResponse) -> Option<&str> {
    match response {
        PosResponse::Failed { error } => Some(error.code.as_str()),
        PosResponse::Success { .. } => None,
    }
}

#[test]
fn full_walkthrough() {
    let (mut session, mut api) = setup();

    assert_eq!(
        session.installation_report(&api),
        "SoftPOS App: com.minesec.msa.stage\nInstalled? true"
    );
    assert!(session.warm_up(&mut api).unwrap().is_success());
    assert!(session.activate(&mut api).unwrap().is_success());
    assert!(session.enquiry_app_status(&mut api).unwrap().is_success());

    session.handle_input_amount("10.25");
    let sale = session.sale(&mut api).unwrap();
    assert_eq!(sale.tran_id(), Some("T000001"));
    assert_eq!(sale.data().unwrap()["amount"], "10.25");

    let enquiry = session.enquiry_transaction(&mut api).unwrap();
    assert_eq!(enquiry.tran_id(), Some("T000001"));
    let by_message = session.enquiry_transaction_with_message_id(&mut api).unwrap();
    assert_eq!(by_message.tran_id(), Some("T000001"));

    let void = session.void(&mut api).unwrap();
    assert!(void.is_success());
    assert_eq!(session.cached_transaction_id(), "T000002");

    // A second sale, settled and then refunded.
    session.handle_input_amount("3");
    let sale = session.sale(&mut api).unwrap();
    assert_eq!(sale.tran_id(), Some("T000003"));
    let settlement = session.settle(&mut api).unwrap();
    assert_eq!(settlement.data().unwrap()["netAmount"], "3");
    let refund = session.refund(&mut api).unwrap();
    assert!(refund.is_success());
    assert_eq!(refund.data().unwrap()["orgTranId"], "T000003");

    assert!(session.reload_configuration(&mut api).unwrap().is_success());
    assert!(session.enquiry_bluetooth_status(&mut api).unwrap().is_success());

    // Three lines per call: description, kind, body.
    assert_eq!(session.messages().len(), 12 * 3);
    assert!(session.messages().iter().all(|m| m.starts_with("==> ")));
}

#[test]
fn transcript_order_for_sale() {
    let (mut session, mut api) = setup();
    session.warm_up(&mut api).unwrap();
    session.activate(&mut api).unwrap();
    session.clear_log();

    let message_id = session.pos_message_id().to_owned();
    session.sale(&mut api).unwrap();

    let messages = session.messages();
    assert_eq!(
        messages[0],
        format!("==> Sale(amount=2, posMessageId={message_id}, autoDismissResult=true)")
    );
    assert_eq!(messages[1], "==> Success");
    let body: serde_json::Value =
        serde_json::from_str(messages[2].trim_start_matches("==> ")).unwrap();
    assert_eq!(body["status"], "Success");
    assert_eq!(body["data"]["posMessageId"], message_id.as_str());
}

#[test]
fn activation_with_edited_code_fails() {
    let (mut session, mut api) = setup();
    session.set_activation_code_input("0000-0000-0000");
    let response = session.activate(&mut api).unwrap();
    assert_eq!(failure_code(&response), Some("INVALID_ACTIVATION_CODE"));
    assert_eq!(session.messages()[1], "==> Failed");
}

#[test]
fn unparseable_amount_is_submitted_as_zero() {
    let (mut session, mut api) = setup();
    session.warm_up(&mut api).unwrap();
    session.activate(&mut api).unwrap();
    session.handle_input_amount(".");
    let response = session.sale(&mut api).unwrap();
    assert_eq!(failure_code(&response), Some("INVALID_AMOUNT"));
    assert!(session.messages().iter().any(|m| m.starts_with("==> Sale(amount=0,")));
}

#[test]
fn not_installed_launches_nothing() {
    let mut session = ExampleSession::new(SessionConfig::default());
    let mut api = SimulatedPosApi::new(DemoApp::Msa.param()).with_installed(false);
    for result in [
        session.warm_up(&mut api),
        session.sale(&mut api),
        session.settle(&mut api),
    ] {
        assert!(matches!(result, Err(SessionError::NotInstalled { .. })));
    }
    assert!(session.messages().is_empty());
}

#[test]
fn sections_are_titled_in_order() {
    let titles: Vec<String> = UiSection::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(titles.first().map(String::as_str), Some("1. Check SoftPOS Installation"));
    assert_eq!(titles[4], "5. Sale Request");
    assert_eq!(titles.len(), 12);
}
