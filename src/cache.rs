//! Memoized loading for long-lived callers that reduce the same document repeatedly.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::LoadError;
use crate::spec::LoadedSpec;
use crate::types::LoadOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    digest: [u8; 32],
    options: LoadOptions,
}

impl CacheKey {
    fn new(raw: &str, options: &LoadOptions) -> Self {
        Self {
            digest: Sha256::digest(raw.as_bytes()).into(),
            options: *options,
        }
    }
}

/// Single-slot cache of the most recently loaded document.
///
/// Keyed by the SHA-256 of the raw content and the load options. Loading a
/// different document replaces the slot.
#[derive(Debug, Default)]
pub struct SpecCache {
    slot: Option<(CacheKey, Arc<LoadedSpec>)>,
}

impl SpecCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached spec for `raw`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// Returns whatever [`LoadedSpec::parse`] returns. A failed load leaves
    /// the cache empty.
    pub fn get_or_load(
        &mut self,
        raw: &str,
        options: &LoadOptions,
    ) -> Result<Arc<LoadedSpec>, LoadError> {
        let key = CacheKey::new(raw, options);
        if let Some((cached, spec)) = &self.slot {
            if *cached == key {
                tracing::debug!("spec cache hit");
                return Ok(Arc::clone(spec));
            }
        }

        self.slot = None;
        let spec = Arc::new(LoadedSpec::parse(raw, options)?);
        self.slot = Some((key, Arc::clone(&spec)));
        Ok(spec)
    }

    /// Drop the cached document.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Returns true if a document is cached.
    pub fn is_loaded(&self) -> bool {
        self.slot.is_some()
    }
}
