/// End-to-end tests against a mock AgriGuide backend.
///
/// A `tiny_http` server on an ephemeral port answers a scripted list of
/// replies and hands every request it saw back to the test, so the real
/// `HttpTransport` (ureq) path is exercised: headers, bodies, status
/// handling and decoding.
use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::{Value, json};
use tiny_http::{Header, Response, Server, StatusCode};

use agriguide::api::{
    BackendClient, HttpTransport, LanguagesResponse, TranslateRequest, TranslateResponse,
};
use agriguide::dashboard::{Completion, Dashboard, MessageKind, Sender};
use agriguide::dom::page::{PREDICTION_RESULT, dashboard_page};
use agriguide::storage::MemoryStore;

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Captured {
    method: String,
    url: String,
    body: String,
    headers: Vec<(String, String)>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

fn json_reply(status: u16, body: Value) -> Reply {
    Reply {
        status,
        content_type: "application/json",
        body: body.to_string(),
    }
}

/// Serve `replies` in order, one per request, then shut down.
fn spawn_backend(replies: Vec<Reply>) -> (String, Receiver<Captured>, JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        for reply in replies {
            let mut request = match server.recv_timeout(Duration::from_secs(10)) {
                Ok(Some(request)) => request,
                _ => return,
            };
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body,
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
            };
            let _ = tx.send(captured);

            let header =
                Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()).unwrap();
            let response = Response::from_data(reply.body.into_bytes())
                .with_header(header)
                .with_status_code(StatusCode(reply.status));
            let _ = request.respond(response);
        }
    });

    (format!("http://localhost:{port}"), rx, handle)
}

fn dashboard_for(base_url: &str, cookies: &str) -> Dashboard<MemoryStore, HttpTransport> {
    let transport = HttpTransport::new(base_url, Duration::from_secs(5), cookies);
    let mut dashboard = Dashboard::new(
        dashboard_page(),
        MemoryStore::new(),
        BackendClient::new(transport, cookies),
    );
    dashboard.init();
    dashboard
}

fn result_text(d: &Dashboard<MemoryStore, HttpTransport>) -> String {
    let region = d.document().get_element_by_id(PREDICTION_RESULT).unwrap();
    d.document().text_content(region)
}

fn fill_form(d: &mut Dashboard<MemoryStore, HttpTransport>) {
    for (field, value) in [
        ("nitrogen", "90"),
        ("phosphorus", "42"),
        ("potassium", "43"),
        ("temperature", "20.8"),
        ("humidity", "82"),
        ("ph", "6.5"),
        ("rainfall", "202.9"),
    ] {
        assert!(d.set_prediction_input(field, value));
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[test]
fn prediction_round_trip_sends_form_and_csrf_headers() {
    let (url, requests, server) = spawn_backend(vec![json_reply(
        200,
        json!({"crop": "rice", "description": "Rice grows well in humid conditions."}),
    )]);
    let cookies = "sessionid=s1; csrftoken=tok%2B1";
    let mut d = dashboard_for(&url, cookies);
    fill_form(&mut d);

    assert_eq!(d.submit_prediction(), Completion::Applied);

    let text = result_text(&d);
    assert!(text.contains("Recommended Crop: rice"), "{text}");
    assert!(text.contains("Rice grows well in humid conditions."));

    let seen = requests.recv().unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/api/crop-prediction/");
    assert_eq!(seen.header("Content-Type"), Some("application/json"));
    assert_eq!(seen.header("X-CSRFToken"), Some("tok+1"));
    assert_eq!(seen.header("Cookie"), Some(cookies));
    assert_eq!(
        seen.json(),
        json!({
            "nitrogen": "90", "phosphorus": "42", "potassium": "43",
            "temperature": "20.8", "humidity": "82", "ph": "6.5", "rainfall": "202.9"
        })
    );
    server.join().unwrap();
}

#[test]
fn server_error_body_is_rendered_verbatim() {
    let (url, _requests, server) = spawn_backend(vec![json_reply(
        500,
        json!({"error": "Model not loaded"}),
    )]);
    let mut d = dashboard_for(&url, "");
    fill_form(&mut d);

    assert_eq!(d.submit_prediction(), Completion::Applied);
    let text = result_text(&d);
    assert!(text.contains("Error"));
    assert!(text.contains("Model not loaded"));
    assert!(!text.contains("Failed to get prediction"));
    server.join().unwrap();
}

#[test]
fn non_json_gateway_error_is_a_transport_failure() {
    let (url, _requests, server) = spawn_backend(vec![Reply {
        status: 502,
        content_type: "text/html",
        body: "<h1>Bad Gateway</h1>".to_string(),
    }]);
    let mut d = dashboard_for(&url, "");

    assert_eq!(d.submit_prediction(), Completion::Applied);
    let text = result_text(&d);
    assert!(text.contains("Failed to get prediction: server responded with status 502"), "{text}");
    server.join().unwrap();
}

#[test]
fn malformed_payload_is_reported() {
    let (url, _requests, server) =
        spawn_backend(vec![json_reply(200, json!({"status": "ok"}))]);
    let mut d = dashboard_for(&url, "");

    d.submit_prediction();
    let text = result_text(&d);
    assert!(text.contains("Failed to get prediction: unexpected response"), "{text}");
    server.join().unwrap();
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[test]
fn chat_sends_selected_language_without_csrf_when_cookie_missing() {
    let (url, requests, server) = spawn_backend(vec![json_reply(
        200,
        json!({"response": "Sow wheat in November."}),
    )]);
    let mut d = dashboard_for(&url, "sessionid=s1");
    d.change_language("hi");

    assert_eq!(d.send_chat_message("  When to sow wheat?  "), Completion::Applied);

    let seen = requests.recv().unwrap();
    assert_eq!(seen.url, "/api/chatbot/");
    assert_eq!(seen.header("X-CSRFToken"), None);
    assert_eq!(
        seen.json(),
        json!({"message": "When to sow wheat?", "language": "hi"})
    );

    let transcript = d.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].sender, Sender::User);
    assert_eq!(transcript[0].text, "When to sow wheat?");
    assert_eq!(transcript[1].sender, Sender::Bot);
    assert_eq!(transcript[1].text, "Sow wheat in November.");
    assert_eq!(d.typing_placeholders(), 0);
    server.join().unwrap();
}

#[test]
fn unreachable_backend_becomes_bot_error_bubble() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut d = dashboard_for(&format!("http://127.0.0.1:{port}"), "");

    assert_eq!(d.send_chat_message("hello"), Completion::Applied);
    let transcript = d.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].kind, MessageKind::Error);
    assert!(
        transcript[1]
            .text
            .starts_with("Sorry, I couldn't process your request: ")
    );
    assert_eq!(d.typing_placeholders(), 0);
}

// ---------------------------------------------------------------------------
// Languages and translation
// ---------------------------------------------------------------------------

#[test]
fn languages_and_translate_endpoints() {
    let (url, requests, server) = spawn_backend(vec![
        json_reply(200, json!({"languages": {"en": "English", "ta": "Tamil"}})),
        json_reply(
            200,
            json!({
                "original_text": "water the field",
                "translated_text": "வயலுக்கு தண்ணீர் பாய்ச்சு",
                "source_language": "en",
                "target_language": "ta",
                "success": true
            }),
        ),
    ]);
    let client = BackendClient::new(
        HttpTransport::new(&url, Duration::from_secs(5), "csrftoken=abc"),
        "csrftoken=abc",
    );

    match client.languages().unwrap() {
        LanguagesResponse::Languages(map) => {
            assert_eq!(map.get("ta").map(String::as_str), Some("Tamil"));
        }
        other => panic!("unexpected {other:?}"),
    }
    let get = requests.recv().unwrap();
    assert_eq!(get.method, "GET");
    assert_eq!(get.url, "/api/languages/");

    let request = TranslateRequest {
        text: "water the field".into(),
        target_language: "ta".into(),
        source_language: "auto".into(),
    };
    match client.translate(&request).unwrap() {
        TranslateResponse::Translated(t) => assert_eq!(t.target_language, "ta"),
        other => panic!("unexpected {other:?}"),
    }
    let post = requests.recv().unwrap();
    assert_eq!(post.url, "/api/translate/");
    assert_eq!(post.header("X-CSRFToken"), Some("abc"));
    assert_eq!(post.json()["source_language"], "auto");
    server.join().unwrap();
}
