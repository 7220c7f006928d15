//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module handles parsing of the line-oriented event stream produced by
//! OpenAI-compatible chat completion endpoints, converting raw byte streams
//! into structured StreamEvent objects.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability;
use crate::{Error, Result, StreamEvent, StreamResponse};

/// Process a stream of bytes into a stream of server-sent events.
///
/// The OpenAI convention is one event per line: blank lines and lines
/// without a `data:` prefix are skipped, `data: [DONE]` terminates the
/// stream, and every other data payload is decoded as a chunk. Payloads
/// that fail to decode are skipped rather than fatal; transport and
/// encoding failures surface as error items.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<StreamEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer = String::new();

    stream::unfold(
        (stream, buffer, false),
        move |(mut stream, mut buffer, done)| async move {
            if done {
                return None;
            }
            loop {
                // First drain any complete lines already in the buffer.
                while let Some(pos) = buffer.find('\n') {
                    let line: String = buffer.drain(..=pos).collect();
                    match decode_line(&line) {
                        Some(StreamEvent::Done) => {
                            return Some((Ok(StreamEvent::Done), (stream, buffer, true)));
                        }
                        Some(event) => {
                            observability::STREAM_EVENTS.click();
                            return Some((Ok(event), (stream, buffer, false)));
                        }
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => buffer.push_str(&text),
                        Err(e) => {
                            observability::STREAM_ERRORS.click();
                            return Some((
                                Err(Error::encoding(
                                    format!("Invalid UTF-8 in stream: {e}"),
                                    Some(Box::new(e)),
                                )),
                                (stream, buffer, true),
                            ));
                        }
                    },
                    Some(Err(e)) => {
                        observability::STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer, true)));
                    }
                    None => {
                        // End of stream: a trailing unterminated line still counts.
                        if !buffer.is_empty() {
                            let line = std::mem::take(&mut buffer);
                            if let Some(event) = decode_line(&line) {
                                if !matches!(event, StreamEvent::Done) {
                                    observability::STREAM_EVENTS.click();
                                }
                                return Some((Ok(event), (stream, buffer, true)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Decode a single line of the event stream.
///
/// Returns `None` for lines that carry no event: blanks, lines without the
/// `data:` prefix, and data payloads that fail to decode as a chunk.
fn decode_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    let data = line.strip_prefix("data:")?.trim();
    if data == "[DONE]" {
        return Some(StreamEvent::Done);
    }
    match serde_json::from_str::<StreamResponse>(data) {
        Ok(chunk) => Some(StreamEvent::Chunk(chunk)),
        Err(_) => None,
    }
}
