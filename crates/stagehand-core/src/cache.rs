//! Caller-owned cache of directory listings.
//!
//! There is no process-wide state: each [`ListingCache`] belongs to whoever
//! created it, and entries leave it through capacity eviction, expiry, or
//! explicit invalidation after the caller changes the tree.

use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use lru::LruCache;
use tracing::debug;

use crate::Result;
use crate::enumerate::list_files;
use crate::types::ExtensionFilter;
use crate::types::FileRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    root: PathBuf,
    filter: ExtensionFilter,
}

#[derive(Debug)]
struct CachedListing {
    records: Vec<FileRecord>,
    stored_at: Instant,
}

/// Bounded LRU cache of [`list_files`] results keyed by root and filter.
///
/// # Examples
///
/// ```no_run
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use stagehand_core::{ExtensionFilter, ListingCache};
///
/// # fn main() -> Result<(), stagehand_core::StageError> {
/// let capacity = NonZeroUsize::new(64).unwrap();
/// let mut cache = ListingCache::new(capacity).with_ttl(Duration::from_secs(30));
/// let pdfs = ExtensionFilter::new([".pdf"]);
///
/// let count = cache.get_or_list("/srv/staging/course-7", &pdfs)?.len();
/// println!("{count} pdfs");
///
/// // After extracting more files into the tree:
/// cache.invalidate("/srv/staging/course-7");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ListingCache {
    entries: LruCache<CacheKey, CachedListing>,
    ttl: Option<Duration>,
    hits: u64,
    misses: u64,
}

impl ListingCache {
    /// Creates a cache holding at most `capacity` listings, without expiry.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Expires listings older than `ttl`.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the cached listing for `(root, filter)`, enumerating the tree
    /// on a miss or after expiry.
    ///
    /// # Errors
    ///
    /// Propagates [`list_files`] errors; nothing is cached in that case.
    pub fn get_or_list(
        &mut self,
        root: impl AsRef<Path>,
        filter: &ExtensionFilter,
    ) -> Result<&[FileRecord]> {
        let root = std::path::absolute(root.as_ref())?;
        let key = CacheKey {
            root,
            filter: filter.clone(),
        };

        let ttl = self.ttl;
        if self
            .entries
            .peek(&key)
            .is_some_and(|listing| is_expired(listing, ttl))
        {
            debug!(root = %key.root.display(), "cached listing expired");
            self.entries.pop(&key);
        }

        let mut missed = false;
        let root = key.root.clone();
        let listing = self.entries.try_get_or_insert(key, || {
            missed = true;
            list_files(&root, filter).map(|records| CachedListing {
                records,
                stored_at: Instant::now(),
            })
        })?;

        if missed {
            self.misses += 1;
        } else {
            self.hits += 1;
        }
        Ok(&listing.records)
    }

    /// Drops every listing that may contain `path`: listings rooted at or
    /// below it and listings of its ancestors. Returns how many were dropped.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let stale: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.root.starts_with(&path) || path.starts_with(&key.root))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.entries.pop(key);
        }
        debug!(path = %path.display(), dropped = stale.len(), "listing cache invalidated");
        stale.len()
    }

    /// Drops every listing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to enumerate the tree.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

fn is_expired(listing: &CachedListing, ttl: Option<Duration>) -> bool {
    ttl.is_some_and(|ttl| listing.stored_at.elapsed() >= ttl)
}
