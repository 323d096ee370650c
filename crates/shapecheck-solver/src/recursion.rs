//! Recursion guards for name resolution and value validation.
//!
//! The solver can recurse without bound in two places:
//!
//! 1. Following names. [`RecursionGuard`] keeps the set of names on the
//!    current chain, so `A -> B -> A` is reported as a cycle, and caps chain
//!    length.
//! 2. Validating nested values. [`DepthCounter`] only counts nesting: the
//!    same descriptor is legitimately revisited for every element of a
//!    container, so a visiting set would be wrong there.
//!
//! Limits come from a [`RecursionProfile`]:
//!
//! ```ignore
//! let guard = RecursionGuard::<String>::with_profile(RecursionProfile::TypeResolution);
//! ```
//!
//! Debug builds panic when a guard is dropped with entries still open, or
//! when `leave` has no matching `enter`.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named `(max_depth, max_iterations)` presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Name chains: depth 64, 10,000 lookups.
    TypeResolution,
    /// Value nesting: depth 256.
    Validation,
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::TypeResolution => 64,
            Self::Validation => 256,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::TypeResolution => 10_000,
            Self::Validation => 1_000_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Why [`RecursionGuard::enter`] did or did not let the caller in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the current chain.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Cycle detection plus depth and iteration limits over keys of type `K`.
///
/// ```ignore
/// match guard.scope(name.clone(), |guard| follow(guard, &name)) {
///     Ok(resolved) => resolved,
///     Err(RecursionResult::Cycle) => report_cycle(&name),
///     Err(_) => report_too_deep(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Clone> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Clone> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Push `key` onto the chain. Every `Entered` must be paired with
    /// [`leave`](Self::leave).
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: &K) {
        let removed = self.visiting.remove(key);
        debug_assert!(removed, "RecursionGuard::leave without a matching enter");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` with `key` on the chain, or return why it could not be entered.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce(&mut Self) -> T) -> Result<T, RecursionResult> {
        match self.enter(key.clone()) {
            RecursionResult::Entered => {
                let result = f(self);
                self.leave(&key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!("RecursionGuard dropped with {} open entries", self.visiting.len());
        }
    }
}

/// Depth-only limit for value validation.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self { depth: 0, max_depth }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Go one level deeper. On `false` the depth is unchanged and `leave`
    /// must not be called.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {}", self.depth);
        }
    }
}
