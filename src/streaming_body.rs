//! The write end of a cache entry.
//!
//! A `StreamingBody` is handed out by [`Cache::begin_write`] once a slot has
//! been reserved. Chunks are buffered synchronously as they arrive from the
//! transport; nothing is observable to readers until [`finish`] publishes
//! the entry. A body that reaches the per-entry size limit is discarded the
//! moment the limit is hit, so an oversized response never occupies memory
//! while the rest of it streams in.
//!
//! [`Cache::begin_write`]: crate::Cache::begin_write
//! [`finish`]: StreamingBody::finish

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{
    error::Error,
    key::RouteKey,
    store::{EntryMeta, Inner},
};

/// The write end of a cache entry: buffers a response body and commits it
/// on [`finish`](StreamingBody::finish).
///
/// Dropping an unfinished `StreamingBody` abandons the write: buffered data
/// is discarded, the slot is released for other writers, and a previously
/// committed response in the slot is left as it was.
#[derive(Debug)]
pub struct StreamingBody {
    inner: Arc<Mutex<Inner>>,
    route: RouteKey,
    slot_id: u64,
    max_entry_size: u64,
    meta: Option<EntryMeta>,
    chunks: Vec<Bytes>,
    size: u64,
    trailers: HeaderMap,
    state: WriteState,
}

#[derive(Debug, PartialEq)]
enum WriteState {
    Open,
    Oversized,
    Finished,
}

impl StreamingBody {
    pub(crate) fn new(
        inner: Arc<Mutex<Inner>>,
        route: RouteKey,
        slot_id: u64,
        max_entry_size: u64,
        meta: EntryMeta,
    ) -> Self {
        StreamingBody {
            inner,
            route,
            slot_id,
            max_entry_size,
            meta: Some(meta),
            chunks: Vec::new(),
            size: 0,
            trailers: HeaderMap::new(),
            state: WriteState::Open,
        }
    }

    /// Append one chunk of the response body.
    ///
    /// Once the accumulated size reaches the per-entry limit, the buffered
    /// data is dropped, the slot is released for other writers, and this
    /// and every further call (including [`finish`](StreamingBody::finish))
    /// reports [`Error::EntryTooLarge`]. The entry will not be committed.
    pub fn write_chunk(&mut self, chunk: impl Into<Bytes>) -> Result<(), Error> {
        if self.state != WriteState::Open {
            return Err(Error::EntryTooLarge);
        }
        let chunk = chunk.into();
        self.size += chunk.len() as u64;
        if self.size >= self.max_entry_size {
            self.discard();
            return Err(Error::EntryTooLarge);
        }
        self.chunks.push(chunk);
        Ok(())
    }

    /// Replace the trailers recorded so far; the last set wins.
    pub fn set_trailers(&mut self, trailers: HeaderMap) {
        self.trailers = trailers;
    }

    /// Add a single trailer.
    pub fn append_trailer(&mut self, name: HeaderName, value: HeaderValue) {
        self.trailers.append(name, value);
    }

    /// Bytes accepted so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Complete the write, publishing the entry for lookup.
    pub fn finish(mut self) -> Result<(), Error> {
        if self.state != WriteState::Open {
            return Err(Error::EntryTooLarge);
        }
        if self.size >= self.max_entry_size {
            // Only reachable with a zero-byte limit; everything else is
            // caught as the chunks arrive.
            self.discard();
            return Err(Error::EntryTooLarge);
        }
        self.state = WriteState::Finished;
        let Some(meta) = self.meta.take() else {
            return Ok(());
        };
        let chunks = std::mem::take(&mut self.chunks);
        let trailers = std::mem::take(&mut self.trailers);
        self.inner
            .lock()
            .expect("failed to lock cache index")
            .commit_write(&self.route, self.slot_id, meta, chunks, trailers);
        Ok(())
    }

    /// Drop buffered data and free the slot without committing.
    fn discard(&mut self) {
        self.state = WriteState::Oversized;
        self.chunks = Vec::new();
        tracing::debug!(size = self.size, "discarding oversized cache write");
        if let Ok(mut inner) = self.inner.lock() {
            inner.release_write(&self.route, self.slot_id);
        }
    }
}

impl Drop for StreamingBody {
    fn drop(&mut self) {
        if self.state == WriteState::Open {
            self.chunks = Vec::new();
            if let Ok(mut inner) = self.inner.lock() {
                inner.release_write(&self.route, self.slot_id);
            }
        }
    }
}
