//! Incremental UTF-8 stream decoder.
//!
//! Turns a raw byte stream from a model response into an ordered sequence
//! of text fragments. A multi-byte character split across two chunks is
//! held back until its remaining bytes arrive, so a fragment never ends
//! mid-character.
//!
//! The decoder performs no retries: a read error or an invalid byte
//! sequence ends the stream with that error. It also never closes the
//! source; dropping the returned stream drops the source with it, which is
//! how the caller releases the underlying connection.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use glimora_types::error::TurnError;

/// Decoded text fragments of one streaming response.
///
/// Exhausted once consumed; a new call to the producing strategy yields a
/// fresh stream.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TurnError>> + Send + 'static>>;

/// Decode a byte-chunk stream into UTF-8 text fragments.
///
/// Each input chunk normally produces one output fragment. Bytes that end
/// mid-character are carried over into the next fragment. An invalid byte
/// sequence, or a truncated character at end-of-stream, surfaces as
/// [`TurnError::Decode`].
pub fn decode_fragments<S>(source: S) -> impl Stream<Item = Result<String, TurnError>> + Send
where
    S: Stream<Item = Result<Vec<u8>, TurnError>> + Send + 'static,
{
    async_stream::try_stream! {
        let mut source = Box::pin(source);
        let mut buf: Vec<u8> = Vec::new();

        while let Some(chunk) = source.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }
            buf.extend_from_slice(&chunk);

            let valid_len = match std::str::from_utf8(&buf) {
                Ok(text) => text.len(),
                Err(err) => {
                    if err.error_len().is_some() {
                        Err(TurnError::Decode(format!(
                            "invalid UTF-8 at byte {} of stream chunk",
                            err.valid_up_to()
                        )))?;
                    }
                    // Incomplete trailing character; wait for more bytes.
                    err.valid_up_to()
                }
            };

            if valid_len > 0 {
                let rest = buf.split_off(valid_len);
                let fragment = String::from_utf8(std::mem::replace(&mut buf, rest))
                    .expect("prefix validated as UTF-8");
                yield fragment;
            }
        }

        if !buf.is_empty() {
            Err(TurnError::Decode(
                "stream ended mid-character".to_string(),
            ))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn byte_stream(
        chunks: Vec<Result<Vec<u8>, TurnError>>,
    ) -> impl Stream<Item = Result<Vec<u8>, TurnError>> + Send + 'static {
        stream::iter(chunks)
    }

    async fn collect_ok(
        chunks: Vec<&[u8]>,
    ) -> Vec<String> {
        let source = byte_stream(chunks.into_iter().map(|c| Ok(c.to_vec())).collect());
        decode_fragments(source)
            .map(|r| r.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_ascii_chunks_pass_through() {
        let fragments = collect_ok(vec![b"Here", b"'s", b" a suggestion..."]).await;
        assert_eq!(fragments, vec!["Here", "'s", " a suggestion..."]);
        assert_eq!(fragments.concat(), "Here's a suggestion...");
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        // "é" is 0xC3 0xA9; split it between two chunks.
        let fragments = collect_ok(vec![b"caf\xC3", b"\xA9 au lait"]).await;
        assert_eq!(fragments, vec!["caf", "é au lait"]);
        assert_eq!(fragments.concat(), "café au lait");
    }

    #[tokio::test]
    async fn test_four_byte_char_split_three_ways() {
        // U+1F600 is 0xF0 0x9F 0x98 0x80.
        let fragments = collect_ok(vec![b"ok \xF0", b"\x9F", b"\x98\x80 done"]).await;
        assert_eq!(fragments.concat(), "ok \u{1F600} done");
    }

    #[tokio::test]
    async fn test_empty_chunks_are_skipped() {
        let fragments = collect_ok(vec![b"a".as_slice(), b"", b"b"]).await;
        assert_eq!(fragments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_invalid_byte_sequence_is_decode_error() {
        // 0xFF is never valid UTF-8.
        let source = byte_stream(vec![Ok(b"ok".to_vec()), Ok(vec![0xFF, 0x41])]);
        let results: Vec<_> = decode_fragments(source).collect().await;

        assert_eq!(results[0].as_deref().unwrap(), "ok");
        assert!(matches!(results[1], Err(TurnError::Decode(_))));
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_truncated_char_at_end_of_stream() {
        let source = byte_stream(vec![Ok(b"abc\xC3".to_vec())]);
        let results: Vec<_> = decode_fragments(source).collect().await;

        assert_eq!(results[0].as_deref().unwrap(), "abc");
        assert!(matches!(results[1], Err(TurnError::Decode(_))));
    }

    #[tokio::test]
    async fn test_source_error_terminates_stream() {
        let source = byte_stream(vec![
            Ok(b"partial".to_vec()),
            Err(TurnError::Network {
                message: "connection reset".to_string(),
                detail: None,
            }),
        ]);
        let results: Vec<_> = decode_fragments(source).collect().await;

        assert_eq!(results[0].as_deref().unwrap(), "partial");
        assert!(matches!(results[1], Err(TurnError::Network { .. })));
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_concatenation_is_lossless() {
        let text = "ファイルの内容を要約します。Here we go → 🎬 movie night!";
        let bytes = text.as_bytes();
        // Slice into awkward 3-byte chunks to force held-back bytes.
        let chunks: Vec<&[u8]> = bytes.chunks(3).collect();
        let fragments = collect_ok(chunks).await;
        assert_eq!(fragments.concat(), text);
    }
}
