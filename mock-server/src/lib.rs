//! In-memory fake of the Kontur EDI API for integration tests.
//!
//! Serves a single party with one message box and one transformer connector
//! box. Shapes are written as JSON literals so that schema drift against
//! the client DTOs shows up in the client's integration tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64ct::{Base64, Encoding};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_CLIENT_ID: &str = "test-client";
pub const LOGIN: &str = "user@example.com";
pub const PASSWORD: &str = "secret";
pub const PORTAL_SID: &str = "portal-sid-1";
pub const PARTY_ID: &str = "party-1";
pub const BOX_ID: &str = "box-1";
pub const CONNECTOR_BOX_ID: &str = "connector-box-1";

type Params = Query<HashMap<String, String>>;
type ApiResult = Result<Json<Value>, StatusCode>;

#[derive(Debug, Default)]
pub struct Store {
    tokens: HashSet<String>,
    /// Lifecycle calls received per connector interaction id.
    interactions: HashMap<String, Vec<String>>,
    messages: HashMap<String, (Value, Vec<u8>)>,
    connector_events: Vec<Value>,
    box_events: Vec<Value>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let mut store = Store::default();
    seed(&mut store);
    let db: Db = Arc::new(RwLock::new(store));

    Router::new()
        .route("/V1/Authenticate", post(authenticate))
        .route("/V1/Parties/GetAccessiblePartiesInfo", get(accessible_parties))
        .route("/V1/Parties/GetPartyInfo", get(party_info))
        .route("/V1/Boxes/GetBoxesInfo", get(boxes_info))
        .route("/V1/Boxes/GetMainApiBox", get(main_api_box))
        .route("/V1/Boxes/GetConnectorBoxesInfo", get(connector_boxes_info))
        .route("/V1/Organizations/GetOrganizationCatalogueInfo", get(organization_catalogue))
        .route("/V1/Users/GetUsersInfo", get(users_info))
        .route("/V1/Connectors/Transformers/TransformationStarted", post(transformation_started))
        .route("/V1/Connectors/Transformers/TransformationPaused", post(transformation_paused))
        .route("/V1/Connectors/Transformers/TransformationResumed", post(transformation_resumed))
        .route("/V1/Connectors/Transformers/TransformedSuccessfully", post(transformed_successfully))
        .route("/V1/Connectors/Transformers/TransformedUnsuccessfully", post(transformed_unsuccessfully))
        .route("/V1/Connectors/Transformers/StopProcessing", post(stop_processing))
        .route("/V1/Connectors/Transformers/GetEvents", get(connector_events))
        .route("/V1/Connectors/Transformers/GetEventsFrom", get(connector_events_from))
        .route("/V1/Connectors/Transformers/GetMessage", get(connector_message))
        .route("/V1/Messages/SendMessage", post(send_message))
        .route("/V1/Messages/GetOutboxMessage", get(box_message))
        .route("/V1/Messages/GetInboxMessage", get(box_message))
        .route("/V1/Messages/GetEvents", get(box_events))
        .route("/V1/Messages/GetEventsFrom", get(box_events_from))
        .route("/_mock/interactions", get(interactions))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Startup text listing the seeded credentials and ids.
pub fn banner(addr: &str) -> String {
    format!(
        "mock EDI API listening on http://{addr}\n  \
         api client id {API_CLIENT_ID}, login {LOGIN} / {PASSWORD}, portal sid {PORTAL_SID}\n  \
         party {PARTY_ID}, box {BOX_ID}, connector box {CONNECTOR_BOX_ID}"
    )
}

fn seed(store: &mut Store) {
    for (id, file_name, body) in [
        ("msg-in-1", "orders_1.xml", &b"<ORDERS number=\"1\"/>"[..]),
        ("msg-in-2", "orders_2.xml", &b"<ORDERS number=\"2\"/>"[..]),
    ] {
        store.messages.insert(
            id.to_string(),
            (
                json!({"Id": id, "BoxId": CONNECTOR_BOX_ID, "MessageFileName": file_name, "DocumentType": "Orders"}),
                body.to_vec(),
            ),
        );
    }

    store.connector_events = vec![
        new_message_event("ev-1", "2024-05-01T10:00:00Z", "ci-1", "msg-in-1"),
        json!({
            "EventId": "ev-2",
            "EventDateTime": "2024-05-01T11:00:00Z",
            "EventType": "ConnectorSettingsChanged",
            "EventContent": {"Setting": "format"},
            "BoxId": CONNECTOR_BOX_ID,
        }),
        new_message_event("ev-3", "2024-05-01T12:00:00Z", "ci-2", "msg-in-2"),
    ];
}

fn new_message_event(event_id: &str, at: &str, interaction_id: &str, message_id: &str) -> Value {
    json!({
        "EventId": event_id,
        "EventDateTime": at,
        "EventType": "NewMessage",
        "EventContent": {
            "ConnectorInteractionId": interaction_id,
            "MessageMeta": {"Id": message_id, "BoxId": CONNECTOR_BOX_ID, "DocumentType": "Orders"},
            "OutputDocumentType": "Orders",
        },
        "BoxId": CONNECTOR_BOX_ID,
        "PartyId": PARTY_ID,
    })
}

/// Splits `KonturEdiAuth k1=v1,k2=v2` into its key/value segments.
fn auth_segments(headers: &HeaderMap) -> Option<HashMap<String, String>> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let segments = value.strip_prefix("KonturEdiAuth ")?;
    Some(
        segments
            .split(',')
            .filter_map(|segment| segment.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.to_string()))
            .collect(),
    )
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<(), StatusCode> {
    let segments = auth_segments(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    if segments.get("konturediauth_api_client_id").map(String::as_str) != Some(API_CLIENT_ID) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = segments.get("konturediauth_token").ok_or(StatusCode::UNAUTHORIZED)?;
    if db.read().await.tokens.contains(token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Returns the POST payload, or `None` for a marked bodyless request.
fn payload(headers: &HeaderMap, body: &Bytes) -> Result<Option<Bytes>, StatusCode> {
    let marked = headers
        .get("content")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "no");
    match (marked, &body[..]) {
        (true, [1]) => Ok(None),
        (true, _) | (false, []) => Err(StatusCode::BAD_REQUEST),
        (false, _) => Ok(Some(body.clone())),
    }
}

fn require(params: &HashMap<String, String>, name: &str, expected: &str) -> Result<(), StatusCode> {
    match params.get(name) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(StatusCode::NOT_FOUND),
        None => Err(StatusCode::BAD_REQUEST),
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, StatusCode> {
    params.get(name).map(String::as_str).ok_or(StatusCode::BAD_REQUEST)
}

async fn authenticate(State(db): State<Db>, headers: HeaderMap, body: Bytes) -> Result<String, StatusCode> {
    if payload(&headers, &body)?.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let segments = auth_segments(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let get = |key: &str| segments.get(key).map(String::as_str);
    if get("konturediauth_api_client_id") != Some(API_CLIENT_ID) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let by_password =
        get("konturediauth_login") == Some(LOGIN) && get("konturediauth_password") == Some(PASSWORD);
    let by_sid = get("konturediauth_portalsid") == Some(PORTAL_SID);
    if !(by_password || by_sid) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = Uuid::new_v4().to_string();
    db.write().await.tokens.insert(token.clone());
    Ok(token)
}

fn party() -> Value {
    json!({
        "Id": PARTY_ID,
        "Name": "OOO Romashka",
        "Gln": "4607000000001",
        "Inn": "6600000001",
        "Kpp": "660001001",
        "Department": null,
        "IsActive": true,
    })
}

fn main_box() -> Value {
    json!({"Id": BOX_ID, "PartyId": PARTY_ID, "Gln": "4607000000001", "IsMain": true, "IsTest": false})
}

async fn accessible_parties(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authorize(&db, &headers).await?;
    Ok(Json(json!({"Parties": [party()]})))
}

async fn party_info(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "partyId", PARTY_ID)?;
    Ok(Json(party()))
}

async fn boxes_info(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authorize(&db, &headers).await?;
    Ok(Json(json!({"Boxes": [main_box()]})))
}

async fn main_api_box(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "partyId", PARTY_ID)?;
    Ok(Json(main_box()))
}

async fn connector_boxes_info(State(db): State<Db>, headers: HeaderMap) -> ApiResult {
    authorize(&db, &headers).await?;
    Ok(Json(json!({"ConnectorBoxes": [{
        "Id": CONNECTOR_BOX_ID,
        "PartyId": PARTY_ID,
        "ConnectorName": "orders-to-xml",
        "Gln": null,
        "IsTest": true,
    }]})))
}

async fn organization_catalogue(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "partyId", PARTY_ID)?;
    Ok(Json(json!({
        "PartyId": PARTY_ID,
        "OrganizationName": "OOO Romashka",
        "Gln": "4607000000001",
        "Inn": "6600000001",
        "Kpp": "660001001",
        "LegalAddress": {"CountryCode": "RU", "City": "Yekaterinburg", "Street": "Malysheva", "House": "51"},
    })))
}

async fn users_info(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "partyId", PARTY_ID)?;
    Ok(Json(json!({"Users": [
        {"Id": "user-1", "Login": LOGIN, "Name": "Anna", "Email": LOGIN, "IsAdmin": true},
        {"Id": "user-2", "Login": "viewer", "Name": null, "Email": null, "IsAdmin": false},
    ]})))
}

/// Validates a connector lifecycle call and records it under its interaction id.
async fn record_interaction(
    db: &Db,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    operation: String,
) -> Result<(), StatusCode> {
    authorize(db, headers).await?;
    require(params, "connectorBoxId", CONNECTOR_BOX_ID)?;
    let interaction_id = param(params, "connectorInteractionId")?;
    db.write()
        .await
        .interactions
        .entry(interaction_id.to_string())
        .or_default()
        .push(operation);
    Ok(())
}

async fn transformation_started(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    if payload(&headers, &body)?.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    record_interaction(&db, &headers, &params, "Started".to_string()).await?;
    Ok(StatusCode::OK)
}

async fn transformation_paused(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    let operation = match payload(&headers, &body)? {
        Some(bytes) => {
            let reason: String = serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?;
            format!("Paused: {reason}")
        }
        None => "Paused".to_string(),
    };
    record_interaction(&db, &headers, &params, operation).await?;
    Ok(StatusCode::OK)
}

async fn transformation_resumed(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    if payload(&headers, &body)?.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    record_interaction(&db, &headers, &params, "Resumed".to_string()).await?;
    Ok(StatusCode::OK)
}

async fn transformed_successfully(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> ApiResult {
    let content = payload(&headers, &body)?.ok_or(StatusCode::BAD_REQUEST)?;
    let file_name = param(&params, "messageFileName")?.to_string();
    record_interaction(&db, &headers, &params, format!("TransformedSuccessfully: {file_name}")).await?;

    let id = format!("msg-out-{}", Uuid::new_v4());
    let meta = json!({
        "Id": id,
        "BoxId": CONNECTOR_BOX_ID,
        "MessageFileName": file_name,
        "DocumentType": "Orders",
        "CreationDateTime": "2024-05-01T13:00:00Z",
    });
    db.write()
        .await
        .messages
        .insert(id, (meta.clone(), content.to_vec()));
    Ok(Json(meta))
}

async fn transformed_unsuccessfully(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    let operation = match payload(&headers, &body)? {
        Some(bytes) => {
            let errors: Vec<String> = serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?;
            format!("TransformedUnsuccessfully: {}", errors.join("; "))
        }
        None => "TransformedUnsuccessfully".to_string(),
    };
    record_interaction(&db, &headers, &params, operation).await?;
    Ok(StatusCode::OK)
}

async fn stop_processing(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    payload(&headers, &body)?.ok_or(StatusCode::BAD_REQUEST)?;
    let operation = format!(
        "StopProcessing: {} to {}",
        param(&params, "messageId")?,
        param(&params, "recipientGln")?
    );
    record_interaction(&db, &headers, &params, operation).await?;
    Ok(StatusCode::OK)
}

fn limit(events: Vec<Value>, params: &HashMap<String, String>) -> Result<Vec<Value>, StatusCode> {
    match params.get("count") {
        Some(count) => {
            let count: usize = count.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            Ok(events.into_iter().take(count).collect())
        }
        None => Ok(events),
    }
}

/// Builds a batch; an exhausted feed reports `Events: null`.
fn batch(box_id: &str, events: Vec<Value>) -> Value {
    let last_event_id = events.last().map(|event| event["EventId"].clone());
    let events = if events.is_empty() { Value::Null } else { Value::Array(events) };
    json!({"BoxId": box_id, "Events": events, "LastEventId": last_event_id})
}

fn after(events: &[Value], exclusive_event_id: Option<&String>) -> Vec<Value> {
    let start = match exclusive_event_id {
        Some(id) => events
            .iter()
            .position(|event| event["EventId"] == id.as_str())
            .map_or(0, |index| index + 1),
        None => 0,
    };
    events[start..].to_vec()
}

async fn connector_events(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "connectorBoxId", CONNECTOR_BOX_ID)?;
    let events = after(&db.read().await.connector_events, params.get("exclusiveEventId"));
    Ok(Json(batch(CONNECTOR_BOX_ID, limit(events, &params)?)))
}

/// Events at or after `fromDateTime`. Both sides are UTC ISO-8601, so
/// string order is time order.
fn since(events: &[Value], params: &HashMap<String, String>) -> Result<Vec<Value>, StatusCode> {
    let from = param(params, "fromDateTime")?;
    let events = events
        .iter()
        .filter(|event| event["EventDateTime"].as_str().is_some_and(|at| at >= from))
        .cloned()
        .collect();
    limit(events, params)
}

async fn connector_events_from(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "connectorBoxId", CONNECTOR_BOX_ID)?;
    let events = since(&db.read().await.connector_events, &params)?;
    Ok(Json(batch(CONNECTOR_BOX_ID, events)))
}

fn message_entity(meta: &Value, body: &[u8]) -> Value {
    json!({"Meta": meta, "MessageBody": Base64::encode_string(body)})
}

async fn connector_message(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "connectorBoxId", CONNECTOR_BOX_ID)?;
    let store = db.read().await;
    let (meta, body) = store
        .messages
        .get(param(&params, "messageId")?)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(message_entity(meta, body)))
}

async fn send_message(State(db): State<Db>, headers: HeaderMap, Query(params): Params, body: Bytes) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "boxId", BOX_ID)?;
    let content = payload(&headers, &body)?.ok_or(StatusCode::BAD_REQUEST)?;
    let file_name = param(&params, "messageFileName")?;

    let id = format!("msg-{}", Uuid::new_v4());
    let outbox_meta = json!({
        "BoxId": BOX_ID,
        "MessageId": id,
        "DocumentType": "Orders",
        "RecipientGln": "4607000000018",
        "MessageFileName": file_name,
    });
    let meta = json!({"Id": id, "BoxId": BOX_ID, "MessageFileName": file_name, "DocumentType": "Orders"});

    let mut store = db.write().await;
    let event_id = format!("box-ev-{}", store.box_events.len() + 1);
    store.box_events.push(json!({
        "EventId": event_id,
        "EventDateTime": "2024-05-02T09:00:00Z",
        "EventType": "NewOutboxMessage",
        "EventContent": {"OutboxMessageMeta": outbox_meta},
        "BoxId": BOX_ID,
    }));
    store.messages.insert(id, (meta, content.to_vec()));
    Ok(Json(outbox_meta))
}

async fn box_message(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "boxId", BOX_ID)?;
    let store = db.read().await;
    let (meta, body) = store
        .messages
        .get(param(&params, "messageId")?)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(message_entity(meta, body)))
}

async fn box_events(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "boxId", BOX_ID)?;
    let events = after(&db.read().await.box_events, params.get("exclusiveEventId"));
    Ok(Json(batch(BOX_ID, limit(events, &params)?)))
}

async fn box_events_from(State(db): State<Db>, headers: HeaderMap, Query(params): Params) -> ApiResult {
    authorize(&db, &headers).await?;
    require(&params, "boxId", BOX_ID)?;
    let events = since(&db.read().await.box_events, &params)?;
    Ok(Json(batch(BOX_ID, events)))
}

async fn interactions(State(db): State<Db>, Query(params): Params) -> ApiResult {
    let id = param(&params, "connectorInteractionId")?;
    let calls = db.read().await.interactions.get(id).cloned().unwrap_or_default();
    Ok(Json(json!(calls)))
}
