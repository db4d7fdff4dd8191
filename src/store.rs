//! The cache proper: a multi-level index of stored responses.
//!
//! Responses are filed under origin → path → method, each route holding a
//! list of entries ordered by hard expiry (latest first, so the expiry sweep
//! works from the tail). Entries on the same route are told apart by their
//! vary rules. A secondary index maps cache tags to the routes holding
//! tagged entries, for bulk invalidation.
//!
//! All index mutation is synchronous, under a single mutex; per-slot lock
//! state is shared out to read guards and write handles so they can release
//! themselves when dropped.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use crate::{
    body::Body,
    config::CacheOptions,
    error::ConfigError,
    key::{CacheKey, RouteKey},
    streaming_body::StreamingBody,
    tags::{parse_cache_tags, TagIndex},
    variance::VaryRule,
};

/// Milliseconds since the Unix epoch.
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Response metadata supplied when opening a write.
///
/// Timestamps are epoch milliseconds, precomputed by the caller's caching
/// policy. The store compares `delete_at` against the clock and refuses to
/// serve anything past it; `stale_at` is carried for the caller's benefit
/// and never gates retrieval.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub status: StatusCode,
    pub status_message: String,
    /// Response headers. If a cache-tags header is configured, tags are
    /// parsed out of these when the write is opened.
    pub headers: HeaderMap,
    /// Which request-header values this response is keyed to.
    pub vary: VaryRule,
    pub cached_at: u64,
    pub stale_at: u64,
    pub delete_at: u64,
}

impl WriteOptions {
    /// Options for a response servable until `delete_at`.
    pub fn new(status: StatusCode, delete_at: u64) -> Self {
        WriteOptions {
            status,
            status_message: String::new(),
            headers: HeaderMap::new(),
            vary: VaryRule::new(),
            cached_at: epoch_ms(),
            stale_at: delete_at,
            delete_at,
        }
    }
}

/// Everything recorded about a committed response except its body.
#[derive(Debug, Clone)]
pub(crate) struct EntryMeta {
    pub status: StatusCode,
    pub status_message: String,
    pub headers: HeaderMap,
    pub vary: VaryRule,
    pub cache_tags: Vec<String>,
    pub cached_at: u64,
    pub stale_at: u64,
    pub delete_at: u64,
}

/// The published, immutable payload of a committed entry.
///
/// Readers hold an `Arc` to this; removal from the index never invalidates
/// a read already in flight.
#[derive(Debug)]
pub(crate) struct CacheData {
    meta: EntryMeta,
    chunks: Arc<Vec<Bytes>>,
    trailers: HeaderMap,
    size: u64,
}

/// Per-slot lock state, shared with read guards and write handles.
///
/// A pending write excludes readers and other writers; live readers exclude
/// writers but not each other, and never block deletion.
#[derive(Debug, Default)]
pub(crate) struct SlotLock {
    write_pending: AtomicBool,
    readers: AtomicUsize,
}

impl SlotLock {
    fn begin_write(&self) {
        self.write_pending.store(true, Ordering::SeqCst);
    }

    fn release_write(&self) {
        self.write_pending.store(false, Ordering::SeqCst);
    }

    fn write_pending(&self) -> bool {
        self.write_pending.load(Ordering::SeqCst)
    }

    pub(crate) fn readers(&self) -> usize {
        self.readers.load(Ordering::SeqCst)
    }
}

/// Registration of one active reader on a slot.
///
/// Cloning registers another reader; dropping the last one frees the slot
/// for overwrites again.
#[derive(Debug)]
pub(crate) struct ReadGuard {
    lock: Arc<SlotLock>,
}

impl ReadGuard {
    pub(crate) fn register(lock: &Arc<SlotLock>) -> Self {
        lock.readers.fetch_add(1, Ordering::SeqCst);
        ReadGuard {
            lock: Arc::clone(lock),
        }
    }
}

impl Clone for ReadGuard {
    fn clone(&self) -> Self {
        Self::register(&self.lock)
    }
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        self.lock.readers.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One position in a route's entry list: a committed response, or a
/// placeholder a writer is still filling.
#[derive(Debug)]
struct Slot {
    id: u64,
    delete_at: u64,
    vary: VaryRule,
    lock: Arc<SlotLock>,
    data: Option<Arc<CacheData>>,
}

/// A successful retrieval from the cache.
///
/// Holding a `Found` (or any [`Body`] it produces) registers a reader on
/// the entry's slot, which refuses overwrites until the last reader is
/// dropped. Deletion is not refused: a removed entry's body stays readable,
/// because the published chunks are immutable.
#[derive(Debug)]
pub struct Found {
    data: Arc<CacheData>,
    guard: ReadGuard,
}

impl Found {
    pub fn status(&self) -> StatusCode {
        self.data.meta.status
    }

    pub fn status_message(&self) -> &str {
        &self.data.meta.status_message
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.data.meta.headers
    }

    pub fn trailers(&self) -> &HeaderMap {
        &self.data.trailers
    }

    pub fn vary(&self) -> &VaryRule {
        &self.data.meta.vary
    }

    pub fn cache_tags(&self) -> &[String] {
        &self.data.meta.cache_tags
    }

    pub fn cached_at(&self) -> u64 {
        self.data.meta.cached_at
    }

    pub fn stale_at(&self) -> u64 {
        self.data.meta.stale_at
    }

    pub fn delete_at(&self) -> u64 {
        self.data.meta.delete_at
    }

    /// Body size in bytes.
    pub fn size(&self) -> u64 {
        self.data.size
    }

    /// A stream over the entry's chunks, in their original order.
    ///
    /// Several bodies may be read from one `Found` (and from concurrent
    /// `Found`s for the same entry); each counts as a reader until dropped.
    pub fn body(&self) -> Body {
        Body::new(
            Arc::clone(&self.data.chunks),
            self.data.trailers.clone(),
            self.guard.clone(),
        )
    }
}

type MethodMap = HashMap<Method, Vec<Slot>>;
type PathMap = HashMap<String, MethodMap>;

/// Index state behind the store mutex.
#[derive(Debug)]
pub(crate) struct Inner {
    options: CacheOptions,
    routes: HashMap<String, PathMap>,
    tags: TagIndex,
    count: usize,
    size: u64,
    next_slot_id: u64,
}

impl Inner {
    fn new(options: CacheOptions) -> Self {
        Inner {
            options,
            routes: HashMap::new(),
            tags: TagIndex::default(),
            count: 0,
            size: 0,
            next_slot_id: 0,
        }
    }

    /// Drop expired entries from the tail of a route's list.
    ///
    /// The list is sorted by `delete_at` descending, so the sweep stops at
    /// the first entry that is live (or mid-write; a pending slot is left
    /// for its writer to resolve).
    fn sweep(&mut self, route: &RouteKey, now: u64) {
        let Some(list) = self
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.get_mut(&route.method))
        else {
            return;
        };
        let mut removed_tags: Vec<String> = Vec::new();
        let mut removed = 0usize;
        while let Some(last) = list.last() {
            if last.delete_at > now || last.lock.write_pending() {
                break;
            }
            let Some(slot) = list.pop() else {
                break;
            };
            if let Some(data) = slot.data {
                self.count -= 1;
                self.size -= data.size;
                removed_tags.extend_from_slice(&data.meta.cache_tags);
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
            self.unlink_dead(route, &removed_tags);
        }
    }

    /// Unlink `candidates` from the tag index unless a remaining committed
    /// entry on `route` still carries them.
    fn unlink_dead(&mut self, route: &RouteKey, candidates: &[String]) {
        if candidates.is_empty() {
            return;
        }
        let remaining = self
            .routes
            .get(&route.origin)
            .and_then(|paths| paths.get(&route.path))
            .and_then(|methods| methods.get(&route.method));
        let dead: Vec<&String> = candidates
            .iter()
            .filter(|tag| {
                !remaining.map_or(false, |list| {
                    list.iter().any(|slot| {
                        slot.data
                            .as_ref()
                            .map_or(false, |data| data.meta.cache_tags.contains(tag))
                    })
                })
            })
            .collect();
        self.tags.unlink(route, dead);
    }

    /// Drop the now-empty maps on the way down to `route`.
    fn prune_route(&mut self, route: &RouteKey) {
        let mut drop_origin = false;
        if let Some(paths) = self.routes.get_mut(&route.origin) {
            let mut drop_path = false;
            if let Some(methods) = paths.get_mut(&route.path) {
                if methods.get(&route.method).map_or(false, Vec::is_empty) {
                    methods.remove(&route.method);
                }
                drop_path = methods.is_empty();
            }
            if drop_path {
                paths.remove(&route.path);
            }
            drop_origin = paths.is_empty();
        }
        if drop_origin {
            self.routes.remove(&route.origin);
        }
    }

    fn prune_empty(&mut self) {
        self.routes.retain(|_, paths| {
            paths.retain(|_, methods| {
                methods.retain(|_, list| !list.is_empty());
                !methods.is_empty()
            });
            !paths.is_empty()
        });
    }

    /// Account for and unlink a list already detached from the index.
    fn unindex_list(&mut self, route: &RouteKey, list: Vec<Slot>) -> usize {
        let mut removed = 0;
        let mut tags: Vec<String> = Vec::new();
        for slot in list {
            if let Some(data) = slot.data {
                self.count -= 1;
                self.size -= data.size;
                tags.extend_from_slice(&data.meta.cache_tags);
                removed += 1;
            }
        }
        self.tags.unlink(route, tags.iter());
        removed
    }

    /// Remove a route's whole entry list.
    fn remove_route(&mut self, route: &RouteKey) -> usize {
        let Some(list) = self
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.remove(&route.method))
        else {
            return 0;
        };
        let removed = self.unindex_list(route, list);
        self.prune_route(route);
        removed
    }

    /// Remove committed entries on `route` labeled `tag`.
    fn remove_tagged(&mut self, route: &RouteKey, tag: &str) -> usize {
        let Some(list) = self
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.get_mut(&route.method))
        else {
            return 0;
        };
        let mut removed = 0;
        let mut dead_tags: Vec<String> = Vec::new();
        let mut i = 0;
        while i < list.len() {
            let carries = list[i]
                .data
                .as_ref()
                .map_or(false, |data| data.meta.cache_tags.iter().any(|t| t == tag));
            if !carries {
                i += 1;
                continue;
            }
            let slot = list.remove(i);
            if let Some(data) = slot.data {
                self.count -= 1;
                self.size -= data.size;
                dead_tags.extend_from_slice(&data.meta.cache_tags);
                removed += 1;
            }
        }
        self.unlink_dead(route, &dead_tags);
        removed
    }

    /// Publish a finished write into the index.
    ///
    /// If the slot was deleted while the write was buffering, the body is
    /// quietly discarded; the entry is simply gone, as if evicted right
    /// after commit.
    pub(crate) fn commit_write(
        &mut self,
        route: &RouteKey,
        slot_id: u64,
        meta: EntryMeta,
        chunks: Vec<Bytes>,
        trailers: HeaderMap,
    ) {
        let size: u64 = chunks.iter().map(|chunk| chunk.len() as u64).sum();
        let Some(list) = self
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.get_mut(&route.method))
        else {
            tracing::debug!("cache slot removed mid-write; discarding commit");
            return;
        };
        let Some(pos) = list.iter().position(|slot| slot.id == slot_id) else {
            tracing::debug!("cache slot removed mid-write; discarding commit");
            return;
        };
        let mut slot = list.remove(pos);
        let replaced = slot.data.take();
        if let Some(old) = &replaced {
            self.size -= old.size;
        } else {
            self.count += 1;
        }
        self.size += size;
        slot.delete_at = meta.delete_at;
        slot.vary = meta.vary.clone();
        let tags = meta.cache_tags.clone();
        slot.data = Some(Arc::new(CacheData {
            meta,
            chunks: Arc::new(chunks),
            trailers,
            size,
        }));
        slot.lock.release_write();
        let at = list.partition_point(|other| other.delete_at > slot.delete_at);
        list.insert(at, slot);
        self.tags.link(route, &tags);
        if let Some(old) = replaced {
            self.unlink_dead(route, &old.meta.cache_tags);
        }
        self.evict();
    }

    /// Back out of a write without committing.
    ///
    /// A placeholder that never held data is unlinked entirely; a slot that
    /// was being overwritten keeps its previous committed entry.
    pub(crate) fn release_write(&mut self, route: &RouteKey, slot_id: u64) {
        let mut prune = false;
        if let Some(list) = self
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.get_mut(&route.method))
        {
            if let Some(pos) = list.iter().position(|slot| slot.id == slot_id) {
                if list[pos].data.is_none() {
                    let slot = list.remove(pos);
                    slot.lock.release_write();
                    prune = list.is_empty();
                } else {
                    list[pos].lock.release_write();
                }
            }
        }
        if prune {
            self.prune_route(route);
        }
    }

    /// Evict until count and size are back within bounds.
    ///
    /// Each round removes the soonest-to-expire half of every route's list,
    /// skipping slots with a write pending. Breadth-first and approximate:
    /// the per-round removals do not depend on map iteration order, which
    /// keeps the policy deterministic.
    fn evict(&mut self) {
        while self.count > self.options.max_count || self.size > self.options.max_size {
            let removed = self.evict_round();
            if removed == 0 {
                tracing::warn!(
                    count = self.count,
                    size = self.size,
                    "cache over budget but nothing evictable"
                );
                break;
            }
            tracing::debug!(
                removed,
                count = self.count,
                size = self.size,
                "cache eviction round"
            );
        }
        self.prune_empty();
    }

    fn evict_round(&mut self) -> usize {
        let mut removed = 0;
        let mut dead: Vec<(RouteKey, Vec<String>)> = Vec::new();
        for (origin, paths) in self.routes.iter_mut() {
            for (path, methods) in paths.iter_mut() {
                for (method, list) in methods.iter_mut() {
                    let committed = list
                        .iter()
                        .filter(|slot| slot.data.is_some() && !slot.lock.write_pending())
                        .count();
                    if committed == 0 {
                        continue;
                    }
                    let mut quota = (committed + 1) / 2;
                    let mut tags: Vec<String> = Vec::new();
                    let mut i = list.len();
                    while quota > 0 && i > 0 {
                        i -= 1;
                        if list[i].data.is_none() || list[i].lock.write_pending() {
                            continue;
                        }
                        let slot = list.remove(i);
                        if let Some(data) = slot.data {
                            self.count -= 1;
                            self.size -= data.size;
                            tags.extend_from_slice(&data.meta.cache_tags);
                            removed += 1;
                        }
                        quota -= 1;
                    }
                    if !tags.is_empty() {
                        dead.push((
                            RouteKey {
                                origin: origin.clone(),
                                path: path.clone(),
                                method: method.clone(),
                            },
                            tags,
                        ));
                    }
                }
            }
        }
        for (route, tags) in dead {
            self.unlink_dead(&route, &tags);
        }
        removed
    }
}

/// An in-memory store of HTTP responses.
///
/// Entries are filed under (origin, path, method) and told apart by their
/// recorded `Vary` values. The store trusts the expiry timestamps it is
/// handed: entries disappear at `delete_at`, and capacity pressure evicts
/// whole swaths at a time (see [`Cache::begin_write`] and the options on
/// [`CacheOptions`]).
///
/// # Examples
///
/// ```
/// use alcove::{Cache, CacheKey, WriteOptions};
/// use http::{Method, StatusCode};
///
/// let cache = Cache::new();
/// let key = CacheKey::new("https://example.com", "/robots.txt", Method::GET);
///
/// let mut write = cache
///     .begin_write(&key, WriteOptions::new(StatusCode::OK, u64::MAX))
///     .expect("slot is free");
/// write.write_chunk("User-agent: *\n").unwrap();
/// write.finish().unwrap();
///
/// let found = cache.lookup(&key).expect("entry was committed");
/// assert_eq!(found.status(), StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct Cache {
    inner: Arc<Mutex<Inner>>,
}

impl Default for Cache {
    fn default() -> Self {
        Cache::new()
    }
}

impl Cache {
    /// A cache with the default bounds and no cache-tags header.
    pub fn new() -> Self {
        Cache {
            inner: Arc::new(Mutex::new(Inner::new(CacheOptions::default()))),
        }
    }

    /// A cache with the given options.
    ///
    /// Inconsistent options are fatal: no store is constructed.
    pub fn with_options(options: CacheOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Cache {
            inner: Arc::new(Mutex::new(Inner::new(options))),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("failed to lock cache index")
    }

    /// Retrieve the stored response matching `key`, if there is one.
    ///
    /// Expired entries are reaped on the way through. Returns `None` when no
    /// entry matches the key's route and headers, or when the matching slot
    /// is mid-overwrite — the store never serves a half-written entry, and
    /// never serves anything at or past its `delete_at`.
    pub fn lookup(&self, key: &CacheKey) -> Option<Found> {
        self.lookup_at(key, epoch_ms())
    }

    fn lookup_at(&self, key: &CacheKey, now: u64) -> Option<Found> {
        let route = key.route();
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.sweep(&route, now);
        inner.prune_route(&route);
        let list = inner
            .routes
            .get(&route.origin)
            .and_then(|paths| paths.get(&route.path))
            .and_then(|methods| methods.get(&route.method))?;
        for slot in list {
            // Sorted by expiry, descending: everything from the first
            // expired entry onward is at least as stale.
            if slot.delete_at <= now {
                break;
            }
            if !slot.vary.matches(&key.headers) {
                continue;
            }
            if slot.lock.write_pending() {
                return None;
            }
            let data = slot.data.as_ref()?;
            return Some(Found {
                data: Arc::clone(data),
                guard: ReadGuard::register(&slot.lock),
            });
        }
        None
    }

    /// Open a write for `key`, reserving its slot.
    ///
    /// Returns `None` — no error, the caller just skips caching — when the
    /// matching slot has a write pending or readers draining, or when the
    /// store is at entry capacity and there is no matching slot to
    /// overwrite. On success the returned [`StreamingBody`] owns the slot
    /// until it is finished or dropped; a finished write that pushes the
    /// store over its bounds triggers eviction.
    pub fn begin_write(&self, key: &CacheKey, options: WriteOptions) -> Option<StreamingBody> {
        self.begin_write_at(key, options, epoch_ms())
    }

    fn begin_write_at(
        &self,
        key: &CacheKey,
        options: WriteOptions,
        now: u64,
    ) -> Option<StreamingBody> {
        let route = key.route();
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.sweep(&route, now);
        inner.prune_route(&route);

        let max_entry_size = inner.options.max_entry_size;
        let tags = parse_cache_tags(&options.headers, inner.options.cache_tags_header.as_ref());
        let WriteOptions {
            status,
            status_message,
            headers,
            vary,
            cached_at,
            stale_at,
            delete_at,
        } = options;
        let meta = EntryMeta {
            status,
            status_message,
            headers,
            vary,
            cache_tags: tags,
            cached_at,
            stale_at,
            delete_at,
        };

        if let Some(list) = inner
            .routes
            .get_mut(&route.origin)
            .and_then(|paths| paths.get_mut(&route.path))
            .and_then(|methods| methods.get_mut(&route.method))
        {
            if let Some(slot) = list.iter().find(|slot| slot.vary.matches(&key.headers)) {
                if slot.lock.write_pending() || slot.lock.readers() > 0 {
                    return None;
                }
                slot.lock.begin_write();
                let id = slot.id;
                return Some(StreamingBody::new(
                    Arc::clone(&self.inner),
                    route,
                    id,
                    max_entry_size,
                    meta,
                ));
            }
        }

        // No slot to overwrite; a new one needs headroom.
        if inner.count >= inner.options.max_count {
            return None;
        }
        let id = inner.next_slot_id;
        inner.next_slot_id += 1;
        let lock = Arc::new(SlotLock::default());
        lock.begin_write();
        let slot = Slot {
            id,
            delete_at: meta.delete_at,
            vary: meta.vary.clone(),
            lock,
            data: None,
        };
        let list = inner
            .routes
            .entry(route.origin.clone())
            .or_default()
            .entry(route.path.clone())
            .or_default()
            .entry(route.method.clone())
            .or_default();
        let at = list.partition_point(|other| other.delete_at > slot.delete_at);
        list.insert(at, slot);
        Some(StreamingBody::new(
            Arc::clone(&self.inner),
            route,
            id,
            max_entry_size,
            meta,
        ))
    }

    /// The (method, url) pairs with at least one live entry.
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.routes_at(epoch_ms())
    }

    fn routes_at(&self, now: u64) -> Vec<(Method, String)> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let keys: Vec<RouteKey> = inner
            .routes
            .iter()
            .flat_map(|(origin, paths)| {
                paths.iter().flat_map(move |(path, methods)| {
                    methods.keys().map(move |method| RouteKey {
                        origin: origin.clone(),
                        path: path.clone(),
                        method: method.clone(),
                    })
                })
            })
            .collect();
        for route in &keys {
            inner.sweep(route, now);
        }
        inner.prune_empty();

        let mut out = Vec::new();
        for (origin, paths) in &inner.routes {
            for (path, methods) in paths {
                for (method, list) in methods {
                    if list
                        .iter()
                        .any(|slot| slot.data.is_some() && slot.delete_at > now)
                    {
                        out.push((method.clone(), format!("{origin}{path}")));
                    }
                }
            }
        }
        out.sort_by(|a, b| (a.1.as_str(), a.0.as_str()).cmp(&(b.1.as_str(), b.0.as_str())));
        out
    }

    /// Remove every entry under the key's (origin, path, method), whatever
    /// its vary rule. In-flight reads keep their bodies.
    pub fn delete(&self, key: &CacheKey) {
        self.lock().remove_route(&key.route());
    }

    /// Remove a batch of keys in one pass over the index.
    pub fn delete_keys(&self, keys: &[CacheKey]) {
        let mut guard = self.lock();
        for key in keys {
            guard.remove_route(&key.route());
        }
    }

    /// Remove every route under an origin.
    pub fn delete_origin(&self, origin: &str) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(paths) = inner.routes.remove(origin) else {
            return;
        };
        for (path, methods) in paths {
            for (method, list) in methods {
                let route = RouteKey {
                    origin: origin.to_owned(),
                    path: path.clone(),
                    method,
                };
                inner.unindex_list(&route, list);
            }
        }
    }

    /// Remove every entry labeled with any of `tags`, optionally scoped to
    /// one origin. Returns the number of entries removed; tags that no
    /// longer label anything are a no-op.
    pub fn delete_tags(&self, origin: Option<&str>, tags: &[&str]) -> usize {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut removed = 0;
        for tag in tags {
            let routes: Vec<RouteKey> = match inner.tags.routes_of(tag) {
                Some(set) => set
                    .iter()
                    .filter(|route| origin.map_or(true, |origin| route.origin == origin))
                    .cloned()
                    .collect(),
                None => continue,
            };
            for route in routes {
                removed += inner.remove_tagged(&route, tag);
            }
        }
        inner.prune_empty();
        if removed > 0 {
            tracing::debug!(removed, "cache entries purged by tag");
        }
        removed
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total committed body bytes.
    pub fn total_size(&self) -> u64 {
        self.lock().size
    }
}
