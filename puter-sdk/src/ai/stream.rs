//! Live byte streams returned by streaming driver calls.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::{BoxStream, Stream, StreamExt};

use crate::errors::{Error, Result};

/// A streaming response body, yielded chunk by chunk as the server produces
/// it (chat completion deltas, synthesized audio).
///
/// The chunks are handed over raw: no buffering, no framing, no decoding.
/// Transport failures mid-stream surface as `Err` items. Dropping the stream
/// aborts the transfer.
///
/// # Example
/// ```no_run
/// # use futures_util::StreamExt;
/// # async fn run() -> puter::Result<()> {
/// # let puter = puter::Puter::with_token("my-token")?;
/// let mut audio = puter.ai().txt2speech("Hello!", None).await?;
/// while let Some(chunk) = audio.next().await {
///     let bytes = chunk?;
///     // feed bytes to a player or file
/// }
/// # Ok(()) }
/// ```
pub struct ByteStream {
    inner: BoxStream<'static, Result<Vec<u8>>>,
}

impl ByteStream {
    /// Wrap a status-checked response body.
    pub(crate) fn from_response(response: reqwest::Response) -> ByteStream {
        let inner = response
            .bytes_stream()
            .map(|chunk| match chunk {
                Ok(bytes) => Ok(bytes.to_vec()),
                Err(source) => Err(Error::from(source)),
            })
            .boxed();
        ByteStream { inner }
    }

    /// Drain the stream into one buffer, failing on the first transport
    /// error.
    pub async fn collect_bytes(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.inner.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer)
    }
}

impl Stream for ByteStream {
    type Item = Result<Vec<u8>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}
