/// LLM Client — the single point of entry for all Mistral API calls in Authentiq.
///
/// ARCHITECTURAL RULE: No other module may call the Mistral API directly.
/// All LLM interactions (chat, tool-calling turns, embeddings) MUST go
/// through this module.
///
/// Models: mistral-large-latest for chat, mistral-embed for embeddings
/// (hardcoded — do not make configurable to prevent drift).
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const CHAT_COMPLETIONS_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const EMBEDDINGS_URL: &str = "https://api.mistral.ai/v1/embeddings";
/// Chat model used for extraction, summaries, and the agent controller.
pub const CHAT_MODEL: &str = "mistral-large-latest";
/// Embedding model. Its output dimensionality is fixed at 1024.
pub const EMBED_MODEL: &str = "mistral-embed";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Chat wire types
// ────────────────────────────────────────────────────────────────────────────

/// One entry in the append-only message log of an agent turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text("assistant", content)
    }

    /// An assistant message that proposed tool calls.
    pub fn assistant_calls(content: Option<String>, calls: Vec<ToolCall>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content,
            tool_calls: Some(calls),
            tool_call_id: None,
            name: None,
        }
    }

    /// The serialized result of a tool invocation, echoed back to the model.
    pub fn tool_result(call_id: &str, tool_name: &str, payload: String) -> Self {
        ChatMessage {
            role: "tool".to_string(),
            content: Some(payload),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
            name: Some(tool_name.to_string()),
        }
    }

    fn text(role: &str, content: impl Into<String>) -> Self {
        ChatMessage {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }
}

/// A function tool the controller may invoke.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    pub fn function(
        name: &'static str,
        description: &'static str,
        parameters: serde_json::Value,
    ) -> Self {
        ToolSpec {
            kind: "function",
            function: FunctionSpec {
                name,
                description,
                parameters,
            },
        }
    }
}

/// A tool invocation proposed by the model. `arguments` is a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_call_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

fn function_call_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantTurn,
}

/// The assistant's half of one controller exchange: free text, proposed
/// tool calls, or both.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl AssistantTurn {
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Embedding wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct MistralError {
    message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in Authentiq.
/// Wraps the Mistral chat and embeddings APIs with retry logic and
/// structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// One controller exchange: the full message log plus the tool schemas.
    /// The model replies with text, tool calls, or both.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn, LlmError> {
        let request = ChatRequest {
            model: CHAT_MODEL,
            max_tokens: MAX_TOKENS,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        let response: ChatResponse = self.post_json(CHAT_COMPLETIONS_URL, &request).await?;

        debug!(
            "LLM chat succeeded: prompt_tokens={}, completion_tokens={}",
            response.usage.prompt_tokens, response.usage.completion_tokens
        );

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(LlmError::EmptyContent)
    }

    /// One-shot completion with a system prompt, returning the text content.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];
        let turn = self.chat(&messages, &[]).await?;
        turn.content
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    /// Convenience method that completes and deserializes the text response
    /// as JSON. The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(prompt, system).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }

    /// Embeds one text into a fixed-length dense vector via mistral-embed.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = EmbeddingRequest {
            model: EMBED_MODEL,
            input: [text],
        };

        let response: EmbeddingResponse = self.post_json(EMBEDDINGS_URL, &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or(LlmError::EmptyContent)
    }

    /// Posts a JSON body, retrying on 429 and 5xx with exponential backoff,
    /// and deserializes the success response.
    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse the API error message
                let message = serde_json::from_str::<MistralError>(&body)
                    .ok()
                    .and_then(|e| e.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_assistant_turn_tool_call_deserializes() {
        let json = r#"{
            "content": null,
            "tool_calls": [
                {
                    "id": "call_0",
                    "function": {
                        "name": "extract_query",
                        "arguments": "{\"text\": \"Senior React dev\"}"
                    }
                }
            ]
        }"#;

        let turn: AssistantTurn = serde_json::from_str(json).unwrap();
        assert!(turn.has_tool_calls());
        let calls = turn.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "extract_query");
        let args: serde_json::Value = serde_json::from_str(&calls[0].function.arguments).unwrap();
        assert_eq!(args["text"], "Senior React dev");
    }

    #[test]
    fn test_assistant_turn_plain_text_has_no_calls() {
        let turn: AssistantTurn =
            serde_json::from_str(r#"{"content": "Here are the results."}"#).unwrap();
        assert!(!turn.has_tool_calls());
        assert_eq!(turn.content.as_deref(), Some("Here are the results."));
    }

    #[test]
    fn test_tool_result_message_shape() {
        let msg = ChatMessage::tool_result("call_0", "find_candidates", "[]".to_string());
        assert_eq!(msg.role, "tool");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_0"));
        assert_eq!(msg.name.as_deref(), Some("find_candidates"));
        assert_eq!(msg.content.as_deref(), Some("[]"));
    }
}
