//! Bounded memo of generated gears, for callers that regenerate on every parameter change.
//!
//! The cache lives next to the pipeline, never inside it: [`crate::generate`] stays a pure
//! function and only this type holds state.

use crate::errors::GearError;
use crate::pipeline::{GeneratedGear, generate};
use crate::spec::{GearSpec, SpecKey};
use hashbrown::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// First-in, first-out cache of [`GeneratedGear`]s keyed by [`GearSpec::cache_key`].
///
/// Failed generations are not cached.
#[derive(Debug, Clone)]
pub struct OutlineCache {
    capacity: usize,
    entries: HashMap<SpecKey, Arc<GeneratedGear>>,
    order: VecDeque<SpecKey>,
}

impl OutlineCache {
    pub const DEFAULT_CAPACITY: usize = 32;

    /// A cache holding at most `capacity` gears (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Cached gear for `spec`, generating and storing it on a miss.
    pub fn get_or_generate(&mut self, spec: &GearSpec) -> Result<Arc<GeneratedGear>, GearError> {
        let key = spec.cache_key();
        if let Some(gear) = self.entries.get(&key) {
            trace!(teeth = spec.teeth, "outline cache hit");
            return Ok(Arc::clone(gear));
        }

        let gear = Arc::new(generate(spec)?);
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key);
        self.entries.insert(key, Arc::clone(&gear));
        trace!(teeth = spec.teeth, len = self.order.len(), "outline cache miss");
        Ok(gear)
    }

    pub fn get(&self, spec: &GearSpec) -> Option<Arc<GeneratedGear>> {
        self.entries.get(&spec.cache_key()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for OutlineCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
