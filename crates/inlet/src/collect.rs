//! Bounded collection over line streams.

use crate::nonblocking::AsyncLineStream;

/// Collect lines from a blocking stream.
///
/// With `limit` absent the stream is drained to its end; with a limit,
/// collection stops as soon as that many lines have been produced or the
/// stream ends, whichever comes first. Order is preserved and nothing is
/// read beyond what the stream itself buffers.
///
/// # Example
///
/// ```ignore
/// use inlet::{collect, LineStream, ModeResolver};
///
/// let first_three = collect(LineStream::open(&ModeResolver::new()), Some(3));
/// ```
pub fn collect<I>(stream: I, limit: Option<usize>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    match limit {
        Some(limit) => stream.into_iter().take(limit).collect(),
        None => stream.into_iter().collect(),
    }
}

/// Collect lines from a cooperative stream.
///
/// Same contract as [`collect`]. The stream is borrowed, so a bounded
/// collection leaves the remaining lines consumable afterwards.
pub async fn collect_async(stream: &mut AsyncLineStream, limit: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    while limit.map_or(true, |limit| lines.len() < limit) {
        match stream.next_line().await {
            Some(line) => lines.push(line),
            None => break,
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockStdin;
    use crate::mode::ModeResolver;
    use crate::stream::LineStream;
    use std::sync::Arc;

    fn ten_lines() -> String {
        (1..=10).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn limit_returns_first_n_in_order() {
        let stream =
            LineStream::with_reader(Arc::new(MockStdin::piped(ten_lines())), &ModeResolver::new());
        let lines = collect(stream, Some(3));
        assert_eq!(lines, vec!["line 1", "line 2", "line 3"]);
    }

    #[test]
    fn no_limit_drains_stream() {
        let stream =
            LineStream::with_reader(Arc::new(MockStdin::piped(ten_lines())), &ModeResolver::new());
        assert_eq!(collect(stream, None).len(), 10);
    }

    #[test]
    fn limit_beyond_stream_length_returns_all() {
        let stream =
            LineStream::with_reader(Arc::new(MockStdin::piped("a\nb")), &ModeResolver::new());
        assert_eq!(collect(stream, Some(5)), vec!["a", "b"]);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let stream =
            LineStream::with_reader(Arc::new(MockStdin::piped("a\nb")), &ModeResolver::new());
        assert!(collect(stream, Some(0)).is_empty());
    }

    #[tokio::test]
    async fn async_limit_leaves_rest_consumable() {
        let mut stream = crate::nonblocking::AsyncLineStream::with_reader(
            Arc::new(MockStdin::piped(ten_lines())),
            &ModeResolver::new(),
        );
        let first = collect_async(&mut stream, Some(3)).await;
        assert_eq!(first, vec!["line 1", "line 2", "line 3"]);
        assert_eq!(stream.next_line().await, Some("line 4".to_string()));
    }

    #[tokio::test]
    async fn async_no_limit_drains_stream() {
        let mut stream = crate::nonblocking::AsyncLineStream::with_reader(
            Arc::new(MockStdin::piped("a\nb\nc")),
            &ModeResolver::new(),
        );
        assert_eq!(collect_async(&mut stream, None).await, vec!["a", "b", "c"]);
    }
}
