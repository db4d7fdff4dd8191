//! Body type for reading a cached response back out.

use std::{
    convert::Infallible,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use bytes::Bytes;
use http::HeaderMap;
use http_body::{Body as HttpBody, SizeHint};

use crate::store::ReadGuard;

/// A cached response body.
///
/// Produces the committed chunks in their original order, then the entry's
/// trailers. The underlying storage is shared and immutable, so reading
/// never fails and never blocks; the stream is finite and cannot be
/// restarted.
///
/// Every live `Body` counts as a reader of its entry and holds off
/// overwrites of the slot until it is dropped. Deletion is not held off:
/// a `Body` keeps producing its chunks even if the entry is removed from
/// the index mid-read.
#[derive(Debug)]
pub struct Body {
    chunks: Arc<Vec<Bytes>>,
    next: usize,
    trailers: HeaderMap,
    _reader: ReadGuard,
}

impl Body {
    pub(crate) fn new(chunks: Arc<Vec<Bytes>>, trailers: HeaderMap, reader: ReadGuard) -> Self {
        Body {
            chunks,
            next: 0,
            trailers,
            _reader: reader,
        }
    }

    /// Read the remaining chunks into a byte vector.
    pub async fn read_into_vec(mut self) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(Ok(data)) = self.data().await {
            bytes.extend_from_slice(&data);
        }
        bytes
    }

    /// Read the remaining chunks into a `String`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid UTF-8.
    pub async fn read_into_string(self) -> String {
        String::from_utf8(self.read_into_vec().await).expect("body was not UTF-8")
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_data(
        self: Pin<&mut Self>,
        _cx: &mut Context,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        let this = self.get_mut();
        match this.chunks.get(this.next) {
            Some(chunk) => {
                this.next += 1;
                Poll::Ready(Some(Ok(chunk.clone())))
            }
            None => Poll::Ready(None),
        }
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        _cx: &mut Context,
    ) -> Poll<Result<Option<HeaderMap>, Self::Error>> {
        if self.trailers.is_empty() {
            Poll::Ready(Ok(None))
        } else {
            Poll::Ready(Ok(Some(self.trailers.clone())))
        }
    }

    fn is_end_stream(&self) -> bool {
        self.next >= self.chunks.len()
    }

    fn size_hint(&self) -> SizeHint {
        let remaining: u64 = self.chunks[self.next..].iter().map(|c| c.len() as u64).sum();
        SizeHint::with_exact(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SlotLock;
    use http::HeaderValue;

    fn body(chunks: Vec<Bytes>, trailers: HeaderMap) -> Body {
        Body::new(
            Arc::new(chunks),
            trailers,
            ReadGuard::register(&Arc::new(SlotLock::default())),
        )
    }

    #[tokio::test]
    async fn yields_chunks_in_order_then_trailers() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-checksum", HeaderValue::from_static("abc"));
        let mut body = body(
            vec![Bytes::from_static(b"ab"), Bytes::from_static(b"cd")],
            trailers,
        );

        assert_eq!(body.size_hint().exact(), Some(4));
        assert!(!body.is_end_stream());

        assert_eq!(body.data().await.unwrap().unwrap(), "ab");
        assert_eq!(body.data().await.unwrap().unwrap(), "cd");
        assert!(body.data().await.is_none());
        assert!(body.is_end_stream());

        let trailers = body.trailers().await.unwrap().unwrap();
        assert_eq!(trailers.get("x-checksum").unwrap(), "abc");
    }

    #[tokio::test]
    async fn empty_body_reads_empty() {
        let body = body(Vec::new(), HeaderMap::new());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert!(body.read_into_vec().await.is_empty());
    }

    #[tokio::test]
    async fn read_into_string_concatenates() {
        let body = body(
            vec![Bytes::from_static(b"hel"), Bytes::from_static(b"lo")],
            HeaderMap::new(),
        );
        assert_eq!(body.read_into_string().await, "hello");
    }

    #[test]
    fn dropping_the_body_releases_its_reader() {
        let lock = Arc::new(SlotLock::default());
        let body = Body::new(
            Arc::new(Vec::new()),
            HeaderMap::new(),
            ReadGuard::register(&lock),
        );
        assert_eq!(lock.readers(), 1);
        drop(body);
        assert_eq!(lock.readers(), 0);
    }
}
