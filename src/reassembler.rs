//! Reassembly of a chunked text stream into newline-delimited records.
//!
//! Upstream fragments are not aligned to lines: one fragment may carry half a
//! record, several records, or a record's closing brace plus the start of the
//! next. [`LineBuffer`] holds the unfinished tail between fragments and hands
//! back every line once its newline has arrived.

use std::fmt::Display;

use futures::{Stream, StreamExt};

/// Accumulates text fragments and splits them into trimmed, non-blank lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` and drain every complete line it finishes.
    pub fn ingest(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines
    }

    /// Whatever is left once the stream has ended, if it isn't blank.
    pub fn finish(self) -> Option<String> {
        let rest = self.buffer.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

/// The in-band record that ends a failed stream.
pub fn error_record(err: impl Display) -> String {
    let message = format!("An error occurred while generating the schedule: {}", err);
    serde_json::json!({ "error": message }).to_string()
}

/// Turn a stream of text fragments into a stream of complete lines.
///
/// The first upstream error ends the output with a single [`error_record`];
/// any partial line still buffered at that point is dropped.
pub fn reassemble<S, E>(fragments: S) -> impl Stream<Item = String>
where
    S: Stream<Item = Result<String, E>>,
    E: Display,
{
    async_stream::stream! {
        let mut buffer = LineBuffer::new();
        futures::pin_mut!(fragments);

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => {
                    for line in buffer.ingest(&text) {
                        yield line;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "reassemble: upstream stream failed");
                    yield error_record(&e);
                    return;
                }
            }
        }

        if let Some(rest) = buffer.finish() {
            yield rest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    async fn collect(fragments: Vec<Result<&str, &str>>) -> Vec<String> {
        let fragments = stream::iter(
            fragments
                .into_iter()
                .map(|f| f.map(str::to_string).map_err(str::to_string)),
        );
        reassemble(fragments).collect().await
    }

    #[test]
    fn test_ingest_splits_across_fragments() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.ingest("abc\ndef"), vec!["abc"]);
        assert_eq!(buffer.ingest("\nghi"), vec!["def"]);
        assert_eq!(buffer.finish(), Some("ghi".to_string()));
    }

    #[test]
    fn test_ingest_holds_partial_line() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.ingest("{\"day\": ").is_empty());
        assert!(buffer.ingest("1}").is_empty());
        assert_eq!(buffer.ingest("\n"), vec!["{\"day\": 1}"]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.ingest("\n\n  a  \r\n\t\nb\n"), vec!["a", "b"]);
        assert_eq!(buffer.ingest("   "), Vec::<String>::new());
        assert_eq!(buffer.finish(), None);
    }

    #[tokio::test]
    async fn test_reassemble_flushes_tail() {
        let lines = collect(vec![Ok("abc\ndef"), Ok("\nghi")]).await;
        assert_eq!(lines, vec!["abc", "def", "ghi"]);
    }

    #[tokio::test]
    async fn test_single_unterminated_fragment() {
        let lines = collect(vec![Ok("  {\"day\": 1}  ")]).await;
        assert_eq!(lines, vec!["{\"day\": 1}"]);
    }

    #[tokio::test]
    async fn test_empty_stream_yields_nothing() {
        assert!(collect(vec![]).await.is_empty());
        assert!(collect(vec![Ok(""), Ok("\n")]).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_lines_pass_through() {
        let lines = collect(vec![Ok("{not json\n{\"day\": 2}\n")]).await;
        assert_eq!(lines, vec!["{not json", "{\"day\": 2}"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream_with_one_record() {
        let lines = collect(vec![Ok("a\nparti"), Err("connection reset"), Ok("never\n")]).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "a");

        let last: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        let message = last["error"].as_str().unwrap();
        assert!(message.contains("connection reset"));
        assert_eq!(last.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_error_record_escapes_message() {
        let record = error_record("bad \"quote\"\nnewline");
        assert!(!record.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&record).unwrap();
        assert_eq!(
            value["error"],
            "An error occurred while generating the schedule: bad \"quote\"\nnewline"
        );
    }
}
