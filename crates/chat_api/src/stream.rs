use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ChatStreamConfig;
use crate::error::{parse_error_message, ChatApiError};
use crate::events::ChatStreamEvent;
use crate::headers::{build_stream_headers, to_header_map, APPLICATION_JSON};
use crate::retry::{is_retryable_http_error, retry_delay};
use crate::sse::SseStreamParser;

/// Posts chat requests to one agent endpoint and decodes the reply.
#[derive(Debug, Clone)]
pub struct ChatStreamClient {
    http: Client,
    config: ChatStreamConfig,
}

impl ChatStreamClient {
    pub fn new(config: ChatStreamConfig) -> Result<Self, ChatApiError> {
        if config.url.trim().is_empty() {
            return Err(ChatApiError::MissingConnectUrl);
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatStreamConfig {
        &self.config
    }

    pub fn build_request(&self, body: &Value) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let headers = to_header_map(&build_stream_headers(&self.config))?;
        Ok(self
            .http
            .post(self.config.url.trim())
            .headers(headers)
            .json(body))
    }

    pub async fn send_with_retry(&self, body: &Value) -> Result<Response, ChatApiError> {
        let max_retries = self.config.max_retries;
        let mut last_status: Option<StatusCode> = None;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match self.build_request(body)?.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    last_status = Some(status);
                    let body_text = response.text().await.unwrap_or_default();
                    let message = parse_error_message(status, &body_text);
                    last_error = Some(message.clone());

                    if attempt < max_retries && is_retryable_http_error(status.as_u16(), &body_text) {
                        debug!(attempt, status = status.as_u16(), "retrying chat request");
                        tokio::time::sleep(retry_delay(self.config.retry_base_delay, attempt)).await;
                        continue;
                    }

                    return Err(ChatApiError::Status(status, message));
                }
                Err(error) => {
                    // The server may already have the message unless the
                    // connection was never established.
                    if !error.is_connect() {
                        warn!(error = %error, "chat request failed");
                        return Err(ChatApiError::Request(error));
                    }
                    last_error = Some(error.to_string());
                    if attempt < max_retries {
                        debug!(attempt, error = %error, "retrying chat request after connect error");
                        tokio::time::sleep(retry_delay(self.config.retry_base_delay, attempt)).await;
                        continue;
                    }
                    warn!(error = %error, "chat request failed after retries");
                    return Err(ChatApiError::RetryExhausted {
                        status: last_status,
                        last_error,
                    });
                }
            }
        }

        Err(ChatApiError::RetryExhausted {
            status: last_status,
            last_error,
        })
    }

    /// Sends `body` and hands each decoded event to `on_event` in arrival
    /// order. Returns the number of delivered events.
    ///
    /// An error event ends the exchange with [`ChatApiError::StreamFailed`];
    /// events before it have already been delivered.
    pub async fn send<F>(&self, body: &Value, mut on_event: F) -> Result<usize, ChatApiError>
    where
        F: FnMut(ChatStreamEvent),
    {
        let response = self.send_with_retry(body).await?;
        let mut delivered = 0;

        if is_json_response(&response) {
            let text = response.text().await?;
            if text.trim().is_empty() {
                return Ok(0);
            }
            let payload = serde_json::from_str::<Value>(&text)?;
            process_event(ChatStreamEvent::from_payload(payload), &mut on_event)?;
            return Ok(1);
        }

        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(ChatApiError::from)?;
            for event in parser.feed(&chunk) {
                process_event(event, &mut on_event)?;
                delivered += 1;
            }
        }
        for event in parser.finish() {
            process_event(event, &mut on_event)?;
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Collects every event of one exchange.
    pub async fn stream(&self, body: &Value) -> Result<Vec<ChatStreamEvent>, ChatApiError> {
        let mut events = Vec::new();
        self.send(body, |event| events.push(event)).await?;
        Ok(events)
    }
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(APPLICATION_JSON))
}

fn process_event<F>(event: ChatStreamEvent, on_event: &mut F) -> Result<(), ChatApiError>
where
    F: FnMut(ChatStreamEvent),
{
    if let ChatStreamEvent::Error { message, .. } = &event {
        return Err(ChatApiError::StreamFailed {
            message: message.clone(),
        });
    }
    on_event(event);
    Ok(())
}
