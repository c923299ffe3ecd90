//! Memoized mask compilation.
//!
//! Compiling a format walks the whole string and allocates a state arena;
//! doing that on every keystroke is wasteful when fields reuse a handful of
//! formats. The registry caches compiled masks behind an `RwLock`ed map keyed
//! by format plus notation table, handing out `Arc`s so callers on any thread
//! share one compiled chain.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::compiler::CompileError;
use crate::mask::Mask;
use crate::model::notation::Notation;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MaskKey {
    format: String,
    notations: Vec<Notation>,
}

/// A thread-safe cache of compiled [`Mask`]s.
#[derive(Debug, Default)]
pub struct MaskRegistry {
    masks: RwLock<HashMap<MaskKey, Arc<Mask>>>,
}

impl MaskRegistry {
    pub fn new() -> MaskRegistry {
        MaskRegistry::default()
    }

    /// Fetch the compiled mask for `format`, compiling and caching it on the
    /// first request. Identical formats with different notation tables are
    /// cached separately.
    ///
    /// Compilation happens outside the lock, so a slow compile never blocks
    /// readers of already-cached masks; two threads racing on the same new
    /// format may both compile, but only one result is kept.
    pub fn get_or_compile(
        &self,
        format: &str,
        notations: &[Notation],
    ) -> Result<Arc<Mask>, CompileError> {
        let key = MaskKey { format: format.to_string(), notations: notations.to_vec() };

        {
            let masks = self.masks.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(mask) = masks.get(&key) {
                return Ok(Arc::clone(mask));
            }
        }

        let compiled = Arc::new(Mask::with_notations(format, notations)?);

        let mut masks = self.masks.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(masks.entry(key).or_insert(compiled)))
    }

    /// Number of cached masks.
    pub fn len(&self) -> usize {
        self.masks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached mask.
    pub fn clear(&self) {
        self.masks.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
