//! Claude API integration for deferred award categories.
//!
//! Categories marked as deferred arrive with a fully computed nominee
//! pool; this crate asks the model to pick one winner from that pool and
//! justify the choice. The call is optional: when it is unavailable or
//! fails, the category stands with its full nominee list and no
//! distinguished winner.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ga_core::CategoryDefinition;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const WINNER_PICK_MAX_TOKENS: u32 = 300;
const WINNER_PICK_TEMPERATURE: f32 = 0.3;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The category has no nominees to pick from.
    #[error("category {id} has an empty nominee pool")]
    EmptyPool { id: String },
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        // Validate API key
        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        // Build HTTP client with timeout
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Pick a single winner from a deferred category's nominee pool.
    pub async fn pick_winner(
        &self,
        model: &str,
        category: &CategoryDefinition,
        tier_noun: &str,
    ) -> Result<WinnerPick, LlmError> {
        if category.nominees.is_empty() {
            return Err(LlmError::EmptyPool {
                id: category.id.clone(),
            });
        }

        let prompt = build_pick_prompt(category, tier_noun);
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: WINNER_PICK_MAX_TOKENS,
            temperature: WINNER_PICK_TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload.content)?;
        let pick = parse_pick(&text)?;
        validate_pick(pick, category)
    }
}

/// The model's choice for a deferred category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerPick {
    /// Display name of the chosen nominee; always one of the pool names.
    pub winner: String,
    /// Model-supplied justification.
    pub justification: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let mut pieces = Vec::new();
    for block in blocks {
        let ContentBlock::Text { text } = block;
        pieces.push(text);
    }
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_pick_prompt(category: &CategoryDefinition, tier_noun: &str) -> String {
    let mut lines = Vec::new();
    lines.push(
        "You are judging a personal gaming award. Pick exactly one winner from the nominees."
            .to_string(),
    );
    lines.push(
        "Return strict JSON: {\"winner\":\"<nominee name>\",\"justification\":\"...\"}"
            .to_string(),
    );
    lines.push("Rules:".to_string());
    lines.push("- The winner must be one of the listed nominee names, verbatim.".to_string());
    lines.push("- Keep the justification to one or two sentences.".to_string());
    lines.push(String::new());
    lines.push(format!("award: {} ({})", category.label, tier_noun));
    lines.push(format!("description: {}", category.description));
    lines.push("nominees:".to_string());
    for nominee in &category.nominees {
        lines.push(format!("- {} ({})", nominee.name, nominee.reason));
    }
    lines.join("\n")
}

fn parse_pick(text: &str) -> Result<WinnerPick, LlmError> {
    #[derive(Deserialize)]
    struct Payload {
        winner: String,
        justification: String,
    }

    let payload: Payload =
        serde_json::from_str(text).map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
    Ok(WinnerPick {
        winner: payload.winner.trim().to_string(),
        justification: payload.justification.trim().to_string(),
    })
}

/// Checks the pick against the nominee pool, normalizing to the pool's
/// spelling of the name. A name outside the pool is an invalid response,
/// not a new winner.
fn validate_pick(pick: WinnerPick, category: &CategoryDefinition) -> Result<WinnerPick, LlmError> {
    category
        .nominees
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(&pick.winner))
        .map(|n| WinnerPick {
            winner: n.name.clone(),
            justification: pick.justification.clone(),
        })
        .ok_or_else(|| {
            LlmError::InvalidResponse(format!("winner {:?} is not in the nominee pool", pick.winner))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::{CategoryKind, ItemId, Nominee, SelectionMode};

    fn category(nominee_names: &[&str]) -> CategoryDefinition {
        CategoryDefinition {
            id: "game-of-the-month".to_string(),
            label: "Game of the Month".to_string(),
            icon: "🏆".to_string(),
            description: "The standout game of the month".to_string(),
            kind: CategoryKind::Showcase,
            selection: SelectionMode::Deferred,
            nominees: nominee_names
                .iter()
                .enumerate()
                .map(|(i, name)| Nominee {
                    item_id: ItemId::new(format!("g{i}")).unwrap(),
                    name: (*name).to_string(),
                    reason: format!("{}h this month · 3 sessions", i + 1),
                    highlight: false,
                })
                .collect(),
        }
    }

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new(""),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_api_key() {
        assert!(matches!(
            Client::new("   "),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_accepts_valid_api_key() {
        assert!(Client::new("sk-ant-api03-valid-key").is_ok());
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn build_pick_prompt_lists_nominees_with_reasons() {
        let cat = category(&["Celeste", "Hades"]);
        let prompt = build_pick_prompt(&cat, "month");
        assert!(prompt.contains("award: Game of the Month (month)"));
        assert!(prompt.contains("- Celeste (1h this month · 3 sessions)"));
        assert!(prompt.contains("- Hades (2h this month · 3 sessions)"));
        assert!(prompt.contains("strict JSON"));
    }

    #[test]
    fn parse_pick_accepts_json() {
        let input = r#"{"winner":"Celeste","justification":"The clear standout."}"#;
        let parsed = parse_pick(input).unwrap();
        assert_eq!(parsed.winner, "Celeste");
        assert_eq!(parsed.justification, "The clear standout.");
    }

    #[test]
    fn parse_pick_rejects_invalid_json() {
        let err = parse_pick("not-json").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn validate_pick_normalizes_to_pool_spelling() {
        let cat = category(&["Celeste", "Hades"]);
        let pick = WinnerPick {
            winner: "celeste".to_string(),
            justification: "Good.".to_string(),
        };
        let validated = validate_pick(pick, &cat).unwrap();
        assert_eq!(validated.winner, "Celeste");
    }

    #[test]
    fn validate_pick_rejects_names_outside_the_pool() {
        let cat = category(&["Celeste", "Hades"]);
        let pick = WinnerPick {
            winner: "Skyrim".to_string(),
            justification: "Hallucinated.".to_string(),
        };
        assert!(matches!(
            validate_pick(pick, &cat),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
