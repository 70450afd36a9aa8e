//! Verify client operations against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation and its arguments, the exact request the
//! client must send, a simulated response, and either the expected decoded
//! result (compared as JSON, so field order does not matter) or the expected
//! error classification.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use kontur_edi_client::{
    ApiError, ClientConfig, EdiApi, HttpMethod, HttpRequest, HttpResponse, HttpTransport, JsonSerializer,
    RequestPipeline, TransformerConnectorClient, TransportError,
};
use serde_json::Value;

const BASE_URL: &str = "http://vectors.test";

/// Replays one simulated response and records the request it answered.
struct ReplayTransport {
    response: HttpResponse,
    sent: Mutex<Option<HttpRequest>>,
}

impl HttpTransport for ReplayTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.sent.lock().unwrap() = Some(request.clone());
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn arg<'a>(args: &'a Value, name: &str) -> &'a str {
    args[name].as_str().unwrap_or_else(|| panic!("missing string argument {name}"))
}

fn optional_arg<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args[name].as_str()
}

fn count_arg(args: &Value) -> Option<u32> {
    args["count"].as_u64().map(|c| c as u32)
}

/// Runs the named operation and returns its result as JSON.
fn invoke(client: &TransformerConnectorClient, operation: &str, args: &Value) -> Result<Value, ApiError> {
    let token = optional_arg(args, "token").unwrap_or_default();
    let result = match operation {
        "authenticate" => Value::String(client.authenticate(arg(args, "login"), arg(args, "password"))?),
        "authenticate_by_portal_sid" => Value::String(client.authenticate_by_portal_sid(arg(args, "portal_sid"))?),
        "get_party_info" => to_json(&client.get_party_info(token, arg(args, "party_id"))?),
        "get_main_api_box" => to_json(&client.get_main_api_box(token, arg(args, "party_id"))?),
        "get_users_info" => to_json(&client.get_users_info(token, arg(args, "party_id"))?),
        "get_boxes_info" => to_json(&client.get_boxes_info(token)?),
        "transformation_started" => {
            client.transformation_started(
                token,
                arg(args, "connector_box_id"),
                arg(args, "connector_interaction_id"),
            )?;
            Value::Null
        }
        "transformation_paused" => {
            client.transformation_paused(
                token,
                arg(args, "connector_box_id"),
                arg(args, "connector_interaction_id"),
                optional_arg(args, "reason"),
            )?;
            Value::Null
        }
        "transformed_unsuccessfully" => {
            let errors: Option<Vec<String>> = serde_json::from_value(args["errors"].clone()).unwrap();
            client.transformed_unsuccessfully(
                token,
                arg(args, "connector_box_id"),
                arg(args, "connector_interaction_id"),
                errors.as_deref(),
            )?;
            Value::Null
        }
        "get_events" => to_json(&client.get_events(
            token,
            arg(args, "connector_box_id"),
            optional_arg(args, "exclusive_event_id"),
            count_arg(args),
        )?),
        "get_events_from" => {
            let from: DateTime<Utc> = arg(args, "from_date_time").parse().unwrap();
            to_json(&client.get_events_from(token, arg(args, "connector_box_id"), from, count_arg(args))?)
        }
        "get_message" => to_json(&client.get_message(
            token,
            arg(args, "connector_box_id"),
            arg(args, "message_id"),
        )?),
        other => panic!("unknown operation: {other}"),
    };
    Ok(result)
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let transport = Arc::new(ReplayTransport {
            response: HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: sim["body"].as_str().unwrap().to_string(),
            },
            sent: Mutex::new(None),
        });
        let pipeline = RequestPipeline::with_parts(
            ClientConfig::new("vector-client", BASE_URL),
            transport.clone(),
            Arc::new(JsonSerializer),
        );
        let client = TransformerConnectorClient::from_pipeline(pipeline);

        let result = invoke(&client, case["operation"].as_str().unwrap(), &case["args"]);

        // Verify request
        let req = transport.sent.lock().unwrap().clone().expect("no request sent");
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.uri, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: uri");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let expected_body: Option<Vec<u8>> = if let Some(text) = expected_req["body_text"].as_str() {
            Some(text.as_bytes().to_vec())
        } else {
            serde_json::from_value(expected_req["body_bytes"].clone()).unwrap()
        };
        assert_eq!(req.body, expected_body, "{name}: body");

        // Verify outcome
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(err.uri(), Some(req.uri.as_str()), "{name}: error uri");
            match expected_error["kind"].as_str().unwrap() {
                "HttpStatus" => assert_eq!(
                    err.status(),
                    expected_error["status"].as_u64().map(|s| s as u16),
                    "{name}: status"
                ),
                "Deserialization" => {
                    assert!(matches!(err, ApiError::Deserialization { .. }), "{name}: expected Deserialization")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn base_test_vectors() {
    run_vectors(include_str!("../../test-vectors/base.json"));
}

#[test]
fn transformer_test_vectors() {
    run_vectors(include_str!("../../test-vectors/transformer.json"));
}
