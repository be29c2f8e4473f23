//! Local axum server answering with canned responses, for exercising the
//! blocking HTTP clients.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

/// A request as seen by the test server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct Responder {
    responses: Arc<Mutex<VecDeque<(StatusCode, Vec<u8>)>>>,
    seen: Arc<Mutex<Sender<RecordedRequest>>>,
}

async fn respond(
    State(state): State<Responder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Vec<u8>) {
    let request = RecordedRequest {
        method,
        uri,
        headers,
        body,
    };
    state.seen.lock().unwrap().send(request).unwrap();

    state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, b"no response queued".to_vec()))
}

/// Serve the canned `(status, body)` responses in order on 127.0.0.1.
///
/// Returns the base URL and a receiver of every request handled. The server
/// runs on its own runtime thread for the rest of the test process.
pub fn serve(responses: Vec<(StatusCode, Vec<u8>)>) -> (String, Receiver<RecordedRequest>) {
    let (tx, rx) = mpsc::channel();
    let state = Responder {
        responses: Arc::new(Mutex::new(responses.into())),
        seen: Arc::new(Mutex::new(tx)),
    };

    // Bound before returning so clients can connect straight away.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let app = Router::new().fallback(respond).with_state(state);
            axum::serve(listener, app).await.unwrap();
        });
    });

    (base_url, rx)
}
