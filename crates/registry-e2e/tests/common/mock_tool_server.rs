#![expect(clippy::print_stderr, reason = "Test diagnostics for mock tool server")]

//! TCP tool server for integration tests.
//!
//! Answers like `registry-e2e serve-stub` unless a tool has been given a
//! different [`ToolBehavior`].

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;

use registry_e2e::adapters::StubToolServer;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

// Shared runtime keeps the mock server running while blocking clients execute.
static RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_io()
        .enable_time()
        .worker_threads(2)
        .build()
        .expect("Failed to create tokio runtime")
});

#[derive(Debug, Clone)]
pub enum ToolBehavior {
    /// Never answer.
    Hang,
    /// A tool result with `isError: true`.
    ToolError(String),
    /// A JSON-RPC error object.
    RpcError { code: i32, message: String },
    /// A line that is not JSON.
    Garbage,
}

type Behaviors = Arc<Mutex<HashMap<String, ToolBehavior>>>;

pub struct MockToolServer {
    addr: SocketAddr,
    behaviors: Behaviors,
    tool_calls: Arc<Mutex<Vec<Value>>>,
    _shutdown: oneshot::Sender<()>,
}

impl MockToolServer {
    pub fn start() -> Self {
        RUNTIME.block_on(Self::bind())
    }

    async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind TCP listener");
        let addr = listener.local_addr().expect("Failed to get TCP addr");
        let behaviors: Behaviors = Arc::new(Mutex::new(HashMap::new()));
        let tool_calls = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(Self::run_server(
            listener,
            behaviors.clone(),
            tool_calls.clone(),
            shutdown_rx,
        ));

        Self {
            addr,
            behaviors,
            tool_calls,
            _shutdown: shutdown_tx,
        }
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn set_behavior(&self, tool: &str, behavior: ToolBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(tool.to_string(), behavior);
    }

    /// `params` of every `tools/call` received, in arrival order.
    pub fn tool_calls(&self) -> Vec<Value> {
        self.tool_calls.lock().unwrap().clone()
    }

    async fn run_server(
        listener: TcpListener,
        behaviors: Behaviors,
        tool_calls: Arc<Mutex<Vec<Value>>>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _)) => {
                            tokio::spawn(Self::handle_connection(
                                stream,
                                behaviors.clone(),
                                tool_calls.clone(),
                            ));
                        }
                        Err(e) => {
                            eprintln!("Mock tool server accept error: {}", e);
                            break;
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    break;
                }
            }
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        behaviors: Behaviors,
        tool_calls: Arc<Mutex<Vec<Value>>>,
    ) {
        let stub = StubToolServer::new();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let request: Value = serde_json::from_str(&line).unwrap_or(Value::Null);
            let behavior = if request["method"] == "tools/call" {
                tool_calls.lock().unwrap().push(request["params"].clone());
                let tool = request["params"]["name"].as_str().unwrap_or_default();
                behaviors.lock().unwrap().get(tool).cloned()
            } else {
                None
            };

            let reply = match behavior {
                None => stub.respond(&line),
                Some(ToolBehavior::Hang) => None,
                Some(ToolBehavior::Garbage) => Some("<html>502 Bad Gateway</html>".to_string()),
                Some(ToolBehavior::ToolError(text)) => Some(
                    json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "result": {"isError": true, "content": [{"type": "text", "text": text}]},
                    })
                    .to_string(),
                ),
                Some(ToolBehavior::RpcError { code, message }) => Some(
                    json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "error": {"code": code, "message": message},
                    })
                    .to_string(),
                ),
            };

            if let Some(reply) = reply {
                if writer.write_all(format!("{}\n", reply).as_bytes()).await.is_err() {
                    break;
                }
            }
        }
    }
}
