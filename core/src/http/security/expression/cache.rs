//! Compiled-expression cache.
//!
//! Maps expression text to its parsed AST. Entries live in a *generation*:
//! a map plus a monotonic id. `clear` installs a fresh generation with a
//! single pointer swap, so readers still working on the old generation
//! finish normally and later readers start from an empty map.
//!
//! Each entry is a once-cell. The first caller for a text runs the parse,
//! concurrent callers for the same text block on the cell and reuse the
//! result. Syntax errors are never stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::error::SyntaxError;
use super::parser::CompiledExpression;

type Slot = Arc<OnceCell<Arc<CompiledExpression>>>;

#[derive(Debug)]
struct Generation {
    id: u64,
    entries: DashMap<String, Slot>,
}

impl Generation {
    fn new(id: u64) -> Self {
        Generation {
            id,
            entries: DashMap::new(),
        }
    }
}

/// Thread-safe text → AST cache.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::CompiledExpressionCache;
///
/// let cache = CompiledExpressionCache::new();
/// let first = cache.get_or_compile("hasRole('admin')").unwrap();
/// let second = cache.get_or_compile("hasRole('admin')").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.compile_count(), 1);
///
/// cache.clear();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug)]
pub struct CompiledExpressionCache {
    current: RwLock<Arc<Generation>>,
    next_generation: AtomicU64,
    compiles: AtomicU64,
}

impl Default for CompiledExpressionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CompiledExpressionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        CompiledExpressionCache {
            current: RwLock::new(Arc::new(Generation::new(0))),
            next_generation: AtomicU64::new(1),
            compiles: AtomicU64::new(0),
        }
    }

    /// Current generation; the lock is only held for the `Arc` clone.
    fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&*self.current.read())
    }

    /// Returns the cached AST for `text`, parsing it on a miss.
    ///
    /// At most one parse per text runs at a time within a generation.
    pub fn get_or_compile(&self, text: &str) -> Result<Arc<CompiledExpression>, SyntaxError> {
        let generation = self.snapshot();

        if let Some(hit) = generation
            .entries
            .get(text)
            .and_then(|slot| slot.value().get().cloned())
        {
            return Ok(hit);
        }

        // Clone the slot out so the shard lock is released before parsing.
        let slot: Slot = generation
            .entries
            .entry(text.to_string())
            .or_default()
            .clone();

        let result = slot
            .get_or_try_init(|| {
                self.compiles.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Compiling permission expression (generation {}): {}",
                    generation.id, text
                );
                CompiledExpression::parse(text).map(Arc::new)
            })
            .cloned();

        if result.is_err() {
            generation
                .entries
                .remove_if(text, |_, slot| slot.get().is_none());
        }

        result
    }

    /// Drops every entry by swapping in an empty generation.
    pub fn clear(&self) {
        let id = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let fresh = Arc::new(Generation::new(id));
        let previous = std::mem::replace(&mut *self.current.write(), fresh);
        debug!(
            "Cleared compiled expression cache (generation {} -> {}, {} entries dropped)",
            previous.id,
            id,
            previous.entries.len()
        );
    }

    /// Removes the entry for a single text. Returns true if one was present.
    pub fn evict(&self, text: &str) -> bool {
        self.snapshot().entries.remove(text).is_some()
    }

    /// Checks whether a compiled AST is cached for `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.snapshot()
            .entries
            .get(text)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Number of entries in the current generation.
    pub fn len(&self) -> usize {
        self.snapshot().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of the current generation; increases on every `clear`.
    pub fn generation(&self) -> u64 {
        self.snapshot().id
    }

    /// Total number of parses run since the cache was created.
    pub fn compile_count(&self) -> u64 {
        self.compiles.load(Ordering::Relaxed)
    }
}
