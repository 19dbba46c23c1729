use crate::severity::Classification;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const HEADER: &str = "The following certificates expire soon:";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("failed to build webhook client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with {status}: {body}")]
    Delivery { status: StatusCode, body: String },
}

/// JSON body posted to the webhook: one `rich_text` block holding a header
/// section and a bulleted list with one entry per warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    RichText { elements: Vec<RichTextElement> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextElement {
    RichTextSection {
        elements: Vec<Inline>,
    },
    RichTextList {
        style: ListStyle,
        elements: Vec<RichTextElement>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Bullet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<TextStyle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
}

impl Inline {
    fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: None,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: Some(TextStyle { bold: true }),
        }
    }
}

impl Notification {
    /// Build one message listing every warning, `None` when there is nothing to say
    #[must_use]
    pub fn from_warnings(warnings: &[Classification]) -> Option<Self> {
        if warnings.is_empty() {
            return None;
        }

        let items = warnings
            .iter()
            .map(|warning| RichTextElement::RichTextSection {
                elements: vec![
                    Inline::plain(format!("{}: ", warning.domain)),
                    Inline::bold(warning.days_left.to_string()),
                    Inline::plain(format!(
                        " days ({})",
                        warning.expires_at.format("%Y-%m-%d")
                    )),
                ],
            })
            .collect();

        Some(Self {
            blocks: vec![Block::RichText {
                elements: vec![
                    RichTextElement::RichTextSection {
                        elements: vec![Inline::plain(HEADER)],
                    },
                    RichTextElement::RichTextList {
                        style: ListStyle::Bullet,
                        elements: items,
                    },
                ],
            }],
        })
    }
}

/// Sends the batched expiry notification
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    client: Client,
    webhook: Option<Url>,
}

impl AlertDispatcher {
    /// Create a dispatcher; without a webhook every dispatch is a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(webhook: Option<Url>) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AlertError::Client)?;

        Ok(Self { client, webhook })
    }

    #[must_use]
    pub const fn webhook(&self) -> Option<&Url> {
        self.webhook.as_ref()
    }

    /// Post one notification for `warnings`
    ///
    /// Returns whether a notification was delivered. Nothing is sent when there
    /// are no warnings or no webhook is configured.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Delivery` with the response body if the webhook
    /// answers with a non-success status, or `AlertError::Transport` if the
    /// request could not be made.
    pub async fn dispatch(&self, warnings: &[Classification]) -> Result<bool, AlertError> {
        let Some(webhook) = &self.webhook else {
            debug!("no webhook configured, skipping notification");
            return Ok(false);
        };
        let Some(notification) = Notification::from_warnings(warnings) else {
            return Ok(false);
        };

        let response = self
            .client
            .post(webhook.clone())
            .json(&notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("failed to read webhook response body: {e}");
                    format!("<unreadable response body: {e}>")
                }
            };
            return Err(AlertError::Delivery { status, body });
        }

        info!("sent expiry notification for {} domain(s)", warnings.len());

        Ok(true)
    }
}
