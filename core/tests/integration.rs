//! End-to-end test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through `UreqTransport`. This checks the exact
//! wire behaviour the mock insists on (auth header, bodyless-POST marker,
//! percent-encoded query parameters) as well as DTO compatibility.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use kontur_edi_client::events::TransformerConnectorEventContent;
use kontur_edi_client::types::{DocumentType, MessageData, ServiceMessageData};
use kontur_edi_client::{ApiError, ClientConfig, EdiApi, MessagesClient, TransformerConnectorClient};
use mock_server::{API_CLIENT_ID, BOX_ID, CONNECTOR_BOX_ID, LOGIN, PARTY_ID, PASSWORD, PORTAL_SID};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(API_CLIENT_ID, &format!("http://{addr}/")).with_timeout(Duration::from_secs(5))
}

/// Lifecycle calls the mock recorded for one interaction.
fn recorded_interactions(addr: SocketAddr, interaction_id: &str) -> Vec<String> {
    let mut response = ureq::get(&format!(
        "http://{addr}/_mock/interactions?connectorInteractionId={interaction_id}"
    ))
    .call()
    .unwrap();
    let body = response.body_mut().read_to_string().unwrap();
    serde_json::from_str(&body).unwrap()
}

#[test]
fn base_operations() {
    let addr = start_server();
    let client = kontur_edi_client::EdiApiClient::new(config(addr)).unwrap();

    // Step 1: both credential forms yield a usable token.
    let token = client.authenticate(LOGIN, PASSWORD).unwrap();
    assert!(!token.is_empty());
    let sid_token = client.authenticate_by_portal_sid(PORTAL_SID).unwrap();
    assert_ne!(token, sid_token);

    // Step 2: lookups.
    let parties = client.get_accessible_parties_info(&token).unwrap();
    assert_eq!(parties.parties.len(), 1);
    assert_eq!(parties.parties[0].id, PARTY_ID);

    let party = client.get_party_info(&sid_token, PARTY_ID).unwrap();
    assert_eq!(party.name.as_deref(), Some("OOO Romashka"));
    assert_eq!(party.department, None);

    let boxes = client.get_boxes_info(&token).unwrap();
    assert_eq!(boxes.boxes[0].id, BOX_ID);

    let main_box = client.get_main_api_box(&token, PARTY_ID).unwrap();
    assert!(main_box.is_main);

    let organization = client.get_organization_catalogue_info(&token, PARTY_ID).unwrap();
    assert_eq!(
        organization.legal_address.and_then(|a| a.city).as_deref(),
        Some("Yekaterinburg")
    );

    let users = client.get_users_info(&token, PARTY_ID).unwrap();
    assert_eq!(users.users.len(), 2);
    assert_eq!(users.users[1].name, None);

    // Step 3: failures carry the request URI.
    let err = client.get_party_info(&token, "unknown party").unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.uri(),
        Some(format!("http://{addr}/V1/Parties/GetPartyInfo?partyId=unknown%20party").as_str())
    );

    let err = client.get_boxes_info("forged-token").unwrap_err();
    assert_eq!(err.status(), Some(401));

    let err = client.authenticate(LOGIN, "wrong").unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 401, .. }));
}

#[test]
fn transformer_connector_lifecycle() {
    let addr = start_server();
    let client = TransformerConnectorClient::new(config(addr)).unwrap();
    let token = client.authenticate(LOGIN, PASSWORD).unwrap();

    // Step 1: the connector box is visible.
    let connector_boxes = client.get_connector_boxes_info(&token).unwrap();
    assert_eq!(connector_boxes.connector_boxes[0].id, CONNECTOR_BOX_ID);

    // Step 2: poll events from the start.
    let batch = client.get_events(&token, CONNECTOR_BOX_ID, None, None).unwrap();
    assert_eq!(batch.events.len(), 3);
    assert_eq!(batch.last_event_id.as_deref(), Some("ev-3"));
    let TransformerConnectorEventContent::NewMessage(first) = &batch.events[0].event_content else {
        panic!("expected NewMessage content, got {:?}", batch.events[0].event_content);
    };
    assert_eq!(first.connector_interaction_id, "ci-1");
    assert_eq!(batch.events[1].event_content, TransformerConnectorEventContent::NoContent);

    // Step 3: fetch the message to transform.
    let message = client
        .get_message(&token, CONNECTOR_BOX_ID, &first.message_meta.id)
        .unwrap();
    assert_eq!(message.meta.document_type, DocumentType::Orders);
    assert_eq!(message.message_body, b"<ORDERS number=\"1\"/>");

    // Step 4: report the lifecycle.
    client.transformation_started(&token, CONNECTOR_BOX_ID, "ci-1").unwrap();
    client
        .transformation_paused(&token, CONNECTOR_BOX_ID, "ci-1", Some("waiting for catalogue"))
        .unwrap();
    client.transformation_paused(&token, CONNECTOR_BOX_ID, "ci-1", None).unwrap();
    client.transformation_resumed(&token, CONNECTOR_BOX_ID, "ci-1").unwrap();
    let result = MessageData {
        message_file_name: "orders 1.edi".to_string(),
        message_body: b"UNH+1+ORDERS:D:01B:UN:EAN010'".to_vec(),
    };
    let meta = client
        .transformed_successfully(&token, CONNECTOR_BOX_ID, "ci-1", &result)
        .unwrap();
    assert_eq!(meta.message_file_name.as_deref(), Some("orders 1.edi"));

    assert_eq!(
        recorded_interactions(addr, "ci-1"),
        vec![
            "Started",
            "Paused: waiting for catalogue",
            "Paused",
            "Resumed",
            "TransformedSuccessfully: orders 1.edi",
        ]
    );

    // Step 5: the uploaded result is retrievable byte for byte.
    let stored = client.get_message(&token, CONNECTOR_BOX_ID, &meta.id).unwrap();
    assert_eq!(stored.message_body, result.message_body);

    // Step 6: the second interaction fails and is stopped.
    let errors = vec!["unknown GTIN 4600000000017".to_string(), "missing price".to_string()];
    client
        .transformed_unsuccessfully(&token, CONNECTOR_BOX_ID, "ci-2", Some(&errors))
        .unwrap();
    client
        .transformed_unsuccessfully(&token, CONNECTOR_BOX_ID, "ci-2", None)
        .unwrap();
    let service_message = ServiceMessageData {
        message_id: "msg-in-2".to_string(),
        message_details: Some("rejected".to_string()),
        recipient_gln: "4607000000018".to_string(),
        message_body: b"<APERAK/>".to_vec(),
    };
    client
        .stop_processing(&token, CONNECTOR_BOX_ID, "ci-2", &service_message)
        .unwrap();
    assert_eq!(
        recorded_interactions(addr, "ci-2"),
        vec![
            "TransformedUnsuccessfully: unknown GTIN 4600000000017; missing price",
            "TransformedUnsuccessfully",
            "StopProcessing: msg-in-2 to 4607000000018",
        ]
    );

    // Step 7: cursors and timestamps.
    let tail = client.get_events(&token, CONNECTOR_BOX_ID, Some("ev-3"), Some(10)).unwrap();
    assert!(tail.events.is_empty());

    let limited = client.get_events(&token, CONNECTOR_BOX_ID, Some("ev-1"), Some(1)).unwrap();
    assert_eq!(limited.events.len(), 1);
    assert_eq!(limited.events[0].event_id, "ev-2");

    let from = Utc.with_ymd_and_hms(2024, 5, 1, 11, 30, 0).unwrap();
    let recent = client.get_events_from(&token, CONNECTOR_BOX_ID, from, None).unwrap();
    assert_eq!(recent.events.len(), 1);
    assert_eq!(recent.events[0].event_id, "ev-3");
}

#[test]
fn message_box_operations() {
    let addr = start_server();
    let client = MessagesClient::new(config(addr)).unwrap();
    let token = client.authenticate(LOGIN, PASSWORD).unwrap();

    let data = MessageData {
        message_file_name: "orders.xml".to_string(),
        message_body: b"<ORDERS/>".to_vec(),
    };
    let sent = client.send_message(&token, BOX_ID, &data).unwrap();
    assert_eq!(sent.message_file_name.as_deref(), Some("orders.xml"));

    let stored = client.get_outbox_message(&token, BOX_ID, &sent.message_id).unwrap();
    assert_eq!(stored.message_body, data.message_body);

    let batch = client.get_events(&token, BOX_ID, None, None).unwrap();
    assert_eq!(batch.events.len(), 1);
    assert!(matches!(
        batch.events[0].event_content,
        kontur_edi_client::events::MessageBoxEventContent::NewOutboxMessage(_)
    ));

    let from = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
    let recent = client.get_events_from(&token, BOX_ID, from, Some(5)).unwrap();
    assert_eq!(recent.events.len(), 1);
    let later = Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap();
    assert!(client.get_events_from(&token, BOX_ID, later, None).unwrap().events.is_empty());

    let inbox = client.get_inbox_message(&token, BOX_ID, "msg-in-1").unwrap();
    assert_eq!(inbox.meta.message_file_name.as_deref(), Some("orders_1.xml"));
}

#[test]
fn unreachable_service_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = TransformerConnectorClient::new(config(addr)).unwrap();

    let err = client.get_connector_boxes_info("T").unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(
        err.uri(),
        Some(format!("http://{addr}/V1/Boxes/GetConnectorBoxesInfo").as_str())
    );
}
