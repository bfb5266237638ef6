use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{info, warn};

use crate::use_cases::{CheckUseCase, DrawUseCase, TicketUseCase};

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, serde::Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    #[serde(default = "default_jsonrpc")]
    jsonrpc: String,
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id: Some(id.unwrap_or(json!(1))),
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
            id,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

pub struct MCPHandler {
    check_use_case: Arc<CheckUseCase>,
    ticket_use_case: Arc<TicketUseCase>,
    draw_use_case: Arc<DrawUseCase>,
}

impl MCPHandler {
    pub fn new(
        check_use_case: Arc<CheckUseCase>,
        ticket_use_case: Arc<TicketUseCase>,
        draw_use_case: Arc<DrawUseCase>,
    ) -> Self {
        Self {
            check_use_case,
            ticket_use_case,
            draw_use_case,
        }
    }

    /// Line-delimited JSON-RPC: one request per line in, one response per line out.
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let request = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {} - Line: {}", e, line);
                    let response = JsonRpcResponse::failure(
                        None,
                        PARSE_ERROR,
                        "Parse error".to_string(),
                        Some(json!(e.to_string())),
                    );
                    write_response(&mut writer, &response)?;
                    continue;
                }
            };

            // Notifications never get a response.
            if request.id.is_none() || request.method.starts_with("notifications/") {
                if request.method == "notifications/initialized" {
                    info!("🎰 Client initialized");
                }
                continue;
            }

            let response = self.handle_request(request).await;
            write_response(&mut writer, &response)?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                info!("🎰 Initializing lotto checker MCP server");
                JsonRpcResponse::success(
                    request.id,
                    json!({
                        "protocolVersion": "2024-11-05",
                        "capabilities": { "tools": {} },
                        "serverInfo": {
                            "name": "lotto-checker-mcp",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                )
            }
            "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": tools() })),
            "tools/call" => self.handle_call_tool(request.params, request.id).await,
            _ => JsonRpcResponse::failure(
                Some(request.id.unwrap_or(json!(1))),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
                None,
            ),
        }
    }

    async fn handle_call_tool(&self, params: Option<Value>, id: Option<Value>) -> JsonRpcResponse {
        let id = Some(id.unwrap_or(json!(1)));

        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params".to_string(), None);
        };
        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name".to_string(), None);
        };

        let arguments: HashMap<String, Value> = match params.get("arguments") {
            None | Some(Value::Null) => HashMap::new(),
            Some(Value::Object(map)) => map.clone().into_iter().collect(),
            Some(other) => {
                return JsonRpcResponse::failure(
                    id,
                    INVALID_PARAMS,
                    "Tool arguments must be an object".to_string(),
                    Some(other.clone()),
                );
            }
        };

        match self.execute_tool(tool_name, &arguments).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": content
                        }
                    ]
                }),
            ),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                JsonRpcResponse::failure(
                    id,
                    INTERNAL_ERROR,
                    format!("Tool execution error: {}", e),
                    None,
                )
            }
        }
    }

    async fn execute_tool(&self, tool_name: &str, arguments: &HashMap<String, Value>) -> Result<String> {
        match tool_name {
            "check_prize" => self.check_use_case.check_prize(arguments).await,
            "check_prizes_batch" => self.check_use_case.check_prizes_batch(arguments).await,
            "is_lucky_number" => self.ticket_use_case.is_lucky_number(arguments).await,
            "filter_tickets" => self.ticket_use_case.filter_tickets(arguments).await,
            "get_draw_result" => self.draw_use_case.get_draw_result(arguments).await,
            "get_draw_history" => self.draw_use_case.get_draw_history(arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", tool_name)),
        }
    }
}

fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
    let response_json = serde_json::to_string(response)?;
    writeln!(writer, "{}", response_json)?;
    writer.flush()?;
    Ok(())
}

fn draw_properties() -> Value {
    json!({
        "draw_id": {
            "type": "string",
            "description": "Draw id from get_draw_history, e.g. 16072568. Omit for the latest draw"
        },
        "raw_json": {
            "type": "string",
            "description": "Provider payload to check against instead of fetching one"
        }
    })
}

fn with_draw_properties(mut properties: Value) -> Value {
    if let (Some(target), Value::Object(extra)) = (properties.as_object_mut(), draw_properties()) {
        target.extend(extra);
    }
    properties
}

fn tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "check_prize",
            description: "Check which prizes a six-digit ticket number won in a draw",
            input_schema: json!({
                "type": "object",
                "properties": with_draw_properties(json!({
                    "ticket_number": {
                        "type": "string",
                        "description": "Six-digit ticket number"
                    }
                })),
                "required": ["ticket_number"]
            }),
        },
        Tool {
            name: "check_prizes_batch",
            description: "Check many ticket numbers against one draw and summarize the winners",
            input_schema: json!({
                "type": "object",
                "properties": with_draw_properties(json!({
                    "ticket_numbers": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Six-digit ticket numbers"
                    }
                })),
                "required": ["ticket_numbers"]
            }),
        },
        Tool {
            name: "is_lucky_number",
            description: "Tell whether a ticket number contains a lucky digit pattern",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ticket_number": {
                        "type": "string",
                        "description": "Ticket number"
                    }
                },
                "required": ["ticket_number"]
            }),
        },
        Tool {
            name: "filter_tickets",
            description: "Filter ticket numbers by lucky pattern and/or last digit",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ticket_numbers": {
                        "type": "array",
                        "items": {"type": "string"}
                    },
                    "lucky_only": {
                        "type": "boolean",
                        "description": "Keep only lucky numbers (default: false)"
                    },
                    "last_digit": {
                        "type": "string",
                        "description": "Keep only numbers ending with this digit"
                    }
                },
                "required": ["ticket_numbers"]
            }),
        },
        Tool {
            name: "get_draw_result",
            description: "Get the normalized prize tiers of a draw",
            input_schema: json!({
                "type": "object",
                "properties": draw_properties()
            }),
        },
        Tool {
            name: "get_draw_history",
            description: "List past draws, newest first",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page": {
                        "type": "integer",
                        "description": "Page number (default: 1)"
                    }
                }
            }),
        },
    ]
}

pub fn stdio() -> (BufReader<io::Stdin>, io::Stdout) {
    (BufReader::new(io::stdin()), io::stdout())
}
