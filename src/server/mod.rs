//! MCP server speaking newline-delimited JSON-RPC over stdio

pub mod protocol;
pub mod tools;

use crate::backend::Services;
use crate::utils::error::{Result, YtSearchError};
use protocol::{
    Request, Response, RpcError, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
    PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct McpServer {
    services: Arc<Services>,
}

impl McpServer {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Serve on the process's stdin/stdout until stdin closes
    pub async fn serve_stdio(self: Arc<Self>) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Every request is handled on its own task; responses are written in
    /// completion order. Returns once the input ends and all in-flight
    /// requests have answered.
    pub async fn run<R, W>(self: Arc<Self>, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<String>(64);

        let writer_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                writer.write_all(message.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // Invalid UTF-8 decodes lossily and is answered as a parse error
            let line = String::from_utf8_lossy(&buf).trim().to_string();
            if line.is_empty() {
                continue;
            }

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(reply) = server.handle_message(&line).await {
                    if tx.send(reply).await.is_err() {
                        warn!("Response dropped: writer closed");
                    }
                }
            });
        }

        info!("Input closed, waiting for in-flight requests");
        drop(tx);
        writer_task
            .await
            .map_err(|e| YtSearchError::Io(std::io::Error::other(e)))??;
        Ok(())
    }

    /// Handle one raw line; `None` when nothing should be sent back
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(Response::failure(
                Value::Null,
                RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
            )),
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<Request>(value) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => Some(Response::failure(
                        id,
                        RpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                    )),
                }
            }
        };

        let response = response?;
        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                None
            }
        }
    }

    /// Dispatch a parsed request; notifications never get a response
    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        debug!("<- {}", request.method);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::get_tools(&self.services) })),
            "tools/call" => self.call_tool(&request.params).await,
            "resources/list" => Ok(json!({ "resources": tools::get_resources() })),
            "resources/read" => self.read_resource(&request.params),
            method if method.starts_with("notifications/") => {
                debug!("Notification: {}", method);
                return None;
            }
            method => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            )),
        };

        let id = request.id?;
        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let settings = self.services.settings();
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!("Client connected: {}", client);

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false }
            },
            "serverInfo": {
                "name": settings.server_name,
                "version": settings.server_version
            }
        })
    }

    async fn call_tool(&self, params: &Value) -> std::result::Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing tool name"))?;

        if !tools::is_known_tool(name) {
            return Err(RpcError::new(INVALID_PARAMS, format!("Unknown tool: {}", name)));
        }

        let empty = json!({});
        let args = params.get("arguments").filter(|a| !a.is_null()).unwrap_or(&empty);
        Ok(tools::call_tool(&self.services, name, args).await.to_value())
    }

    fn read_resource(&self, params: &Value) -> std::result::Result<Value, RpcError> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing resource uri"))?;

        match tools::read_resource(&self.services, uri) {
            None => Err(RpcError::new(INVALID_PARAMS, format!("Unknown resource: {}", uri))),
            Some(Err(e)) => Err(RpcError::new(protocol::INTERNAL_ERROR, e.to_string())),
            Some(Ok(text)) => Ok(json!({
                "contents": [{
                    "uri": uri,
                    "mimeType": "application/json",
                    "text": text
                }]
            })),
        }
    }
}
