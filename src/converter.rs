//! Conversion of Chinese phrases into English variable name candidates.
//!
//! The converter drives one chat completion per invocation, in either
//! buffered or streaming mode, and parses the free-form model output into
//! discrete name candidates.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::client::OpenAiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::prompt::{self, NamingStyle};
use crate::types::{StreamEvent, StreamResponse};

/// Maximum accepted candidate length, in bytes.
const MAX_NAME_LEN: usize = 50;

/// Bounded wait for handing a chunk to the consumer before the stream is
/// declared stalled.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of the chunk channel between producer and consumer.
const CHANNEL_CAPACITY: usize = 16;

/// Converts Chinese phrases into English variable name candidates.
pub struct Converter {
    client: OpenAiClient,
}

impl Converter {
    /// Create a new converter from resolved configuration.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            client: OpenAiClient::new(config)?,
        })
    }

    /// Convert a phrase using a buffered request.
    pub async fn convert(&self, text: &str, style: NamingStyle) -> Result<Vec<String>> {
        let messages = prompt::conversion_messages(text, style);
        let response = self.client.chat(messages).await?;

        let Some(choice) = response.choices.first() else {
            return Err(Error::unknown("model returned no choices"));
        };
        Ok(parse_response(&choice.message.content))
    }

    /// Convert a phrase using a streaming request.
    ///
    /// One background task drains the event stream into a bounded channel;
    /// the caller's task consumes it, forwarding each content delta to
    /// `on_content` and the parsed candidate list to `on_complete` once the
    /// stream finishes. A transport failure aborts the stream and is
    /// reported once. If the consumer stalls for longer than the bounded
    /// send wait, the stream is abandoned with a timeout error.
    pub async fn convert_stream<F, G>(
        &self,
        text: &str,
        style: NamingStyle,
        mut on_content: F,
        on_complete: G,
    ) -> Result<()>
    where
        F: FnMut(&str),
        G: FnOnce(Vec<String>),
    {
        let messages = prompt::conversion_messages(text, style);
        let mut stream = self.client.chat_stream(messages).await?;

        let (chunk_tx, mut chunk_rx) = mpsc::channel::<StreamResponse>(CHANNEL_CAPACITY);
        let (error_tx, mut error_rx) = mpsc::channel::<Error>(1);

        tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(StreamEvent::Done) => break,
                    Ok(StreamEvent::Chunk(chunk)) => {
                        match tokio::time::timeout(SEND_TIMEOUT, chunk_tx.send(chunk)).await {
                            Ok(Ok(())) => {}
                            // Consumer hung up; nothing left to report to.
                            Ok(Err(_)) => return,
                            Err(_) => {
                                let _ = error_tx.try_send(Error::timeout(
                                    "Timed out forwarding a stream chunk to the consumer",
                                    Some(SEND_TIMEOUT.as_secs_f64()),
                                ));
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        let _ = error_tx.try_send(err);
                        return;
                    }
                }
            }
        });

        let mut transcript = String::new();
        let mut error_closed = false;
        loop {
            tokio::select! {
                maybe_chunk = chunk_rx.recv() => match maybe_chunk {
                    Some(chunk) => {
                        if let Some(content) = chunk.delta_content() {
                            transcript.push_str(content);
                            on_content(content);
                        }
                    }
                    None => break,
                },
                maybe_err = error_rx.recv(), if !error_closed => match maybe_err {
                    Some(err) => return Err(err),
                    None => error_closed = true,
                },
            }
        }

        // The producer may report an error in the same instant it closes
        // the chunk channel.
        if let Ok(err) = error_rx.try_recv() {
            return Err(err);
        }

        on_complete(parse_response(&transcript));
        Ok(())
    }
}

/// Parse free-form model output into discrete name candidates.
///
/// Each line is trimmed, stripped of bullet and ordinal prefixes, and split
/// on the literal ` - ` separator between name and explanation. Lines whose
/// extracted token fails the identifier filter are dropped. If no line
/// yields a candidate, the whole cleaned response is returned as a single
/// candidate, so non-empty model output never parses to an empty list.
pub fn parse_response(content: &str) -> Vec<String> {
    let mut results = Vec::new();

    for line in content.lines() {
        let mut line = line.trim();
        if line.is_empty() {
            continue;
        }

        line = line.strip_prefix("- ").unwrap_or(line);
        line = line.strip_prefix("• ").unwrap_or(line);
        line = strip_ordinal(line);

        if let Some((name, _explanation)) = line.split_once(" - ") {
            let name = name.trim();
            if !name.is_empty() && is_valid_name(name) {
                results.push(name.to_string());
            }
        } else if is_valid_name(line) {
            results.push(line.to_string());
        }
    }

    if results.is_empty() {
        let cleaned = content.replace('\n', " ").trim().to_string();
        if !cleaned.is_empty() {
            results.push(cleaned);
        }
    }

    results
}

/// Strip a single leading `1. ` through `10. ` ordinal marker.
fn strip_ordinal(line: &str) -> &str {
    for i in 1..=10 {
        let prefix = format!("{i}. ");
        if let Some(rest) = line.strip_prefix(&prefix) {
            return rest;
        }
    }
    line
}

/// Identifier filter: ASCII alphanumerics, underscore, and hyphen only, no
/// leading digit, bounded length.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return false;
    }
    !name.as_bytes()[0].is_ascii_digit()
}
