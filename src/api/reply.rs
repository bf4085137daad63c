//! Reading the assistant's text out of an upstream completion body.
//!
//! Upstreams answer either with a single JSON completion object or, when the
//! request asked for `stream: true`, with an SSE body of `data:` frames. Both
//! shapes collapse to one string here; anything else is treated as malformed.

use memchr::memchr;

use crate::api::{ChatResponseChunk, CompletionResponse};

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn is_event_stream(body: &str) -> bool {
    body.lines()
        .any(|line| extract_data_payload(line.trim()).is_some())
}

fn collect_event_stream(body: &str) -> Option<String> {
    let mut buffer = body.as_bytes();
    let mut assembled = String::new();

    while !buffer.is_empty() {
        let (line_bytes, rest) = match memchr(b'\n', buffer) {
            Some(newline_pos) => (&buffer[..newline_pos], &buffer[newline_pos + 1..]),
            None => (buffer, &[][..]),
        };
        buffer = rest;

        let Ok(line) = std::str::from_utf8(line_bytes) else {
            return None;
        };
        let Some(payload) = extract_data_payload(line.trim()) else {
            continue;
        };
        if payload == "[DONE]" {
            break;
        }
        if payload.trim().is_empty() {
            continue;
        }

        let chunk = serde_json::from_str::<ChatResponseChunk>(payload).ok()?;
        if let Some(content) = chunk
            .choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
        {
            assembled.push_str(content);
        }
    }

    Some(assembled)
}

/// Returns the reply text carried by an upstream body, or `None` when the body
/// has no usable text.
pub fn extract_reply_text(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let text = if let Ok(response) = serde_json::from_str::<CompletionResponse>(trimmed) {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)?
    } else if is_event_stream(trimmed) {
        collect_event_stream(trimmed)?
    } else {
        return None;
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_content_from_completion_object() {
        let body = r#"{"choices":[{"message":{"content":"试试先列三件最重要的事"}}]}"#;
        assert_eq!(
            extract_reply_text(body).as_deref(),
            Some("试试先列三件最重要的事")
        );
    }

    #[test]
    fn assembles_streamed_deltas() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"深呼吸\"}}]}\n\n",
            "data:{\"choices\":[{\"delta\":{\"content\":\"，慢一点。\"}}]}\r\n\r\n",
            "data: {\"choices\":[{\"delta\":{}}]}\n\n",
            "data: [DONE]\n\n",
        );
        assert_eq!(extract_reply_text(body).as_deref(), Some("深呼吸，慢一点。"));
    }

    #[test]
    fn stops_at_done_marker() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"one\"}}]}\n",
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n",
        );
        assert_eq!(extract_reply_text(body).as_deref(), Some("one"));
    }

    #[test]
    fn rejects_bodies_without_text() {
        assert_eq!(extract_reply_text(""), None);
        assert_eq!(extract_reply_text("   \n"), None);
        assert_eq!(extract_reply_text("<html>bad gateway</html>"), None);
        assert_eq!(extract_reply_text(r#"{"choices":[]}"#), None);
        assert_eq!(
            extract_reply_text(r#"{"choices":[{"message":{"content":"  "}}]}"#),
            None
        );
        assert_eq!(extract_reply_text(r#"{"status":"failed"}"#), None);
    }

    #[test]
    fn rejects_streams_with_error_frames() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n",
            "data: {\"error\":{\"message\":\"overloaded\"}}\n",
        );
        assert_eq!(extract_reply_text(body), None);
    }
}
