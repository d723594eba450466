//! Nullable JSON-RPC endpoint — a local HTTP server answering from a script.
//!
//! Each method has a queue of replies. Replies are consumed in order and the
//! last one repeats. Methods without a script answer `-32601`.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// One scripted reply.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Result(Value),
    Error { code: i64, message: String },
}

impl Reply {
    pub fn result(value: impl Into<Value>) -> Self {
        Reply::Result(value.into())
    }

    pub fn error(code: i64, message: &str) -> Self {
        Reply::Error {
            code,
            message: message.to_string(),
        }
    }
}

#[derive(Default)]
struct Inner {
    replies: HashMap<String, VecDeque<Reply>>,
    requests: Vec<(String, Value)>,
}

impl Inner {
    fn next_reply(&mut self, method: &str) -> Option<Reply> {
        let queue = self.replies.get_mut(method)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// A JSON-RPC 2.0 server on `127.0.0.1` with an ephemeral port.
///
/// The server task is aborted when the stub is dropped.
pub struct NullRpcServer {
    addr: SocketAddr,
    inner: Arc<Mutex<Inner>>,
    task: JoinHandle<()>,
}

impl NullRpcServer {
    pub async fn start() -> std::io::Result<Self> {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let app = Router::new()
            .route("/", post(handle))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("null rpc server stopped: {e}");
            }
        });

        Ok(Self { addr, inner, task })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue a reply for `method`.
    pub fn reply(&self, method: &str, reply: Reply) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Methods received so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    /// Params of every `method` request received so far.
    pub fn params(&self, method: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    /// Number of `method` requests received so far.
    pub fn count(&self, method: &str) -> usize {
        self.params(method).len()
    }
}

impl Drop for NullRpcServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(State(inner): State<Arc<Mutex<Inner>>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let reply = {
        let mut inner = inner.lock().unwrap();
        inner.requests.push((method.clone(), params));
        inner.next_reply(&method)
    };

    let body = match reply {
        Some(Reply::Result(result)) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Some(Reply::Error { code, message }) => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        }
        None => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("the method {method} does not exist") }
        }),
    };
    Json(body)
}
