//! Version-guarded derived state.
//!
//! Highlighting, diagnostics and inlay hints are computed asynchronously against a
//! particular [`Buffer::version`](crate::Buffer::version). Results can arrive out of order,
//! so each slot keeps the version its value was computed for and refuses older results.

/// A value tagged with the buffer version it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Versioned<T> {
    version: u64,
    value: T,
}

impl<T> Versioned<T> {
    /// Wrap a value computed for `version`.
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    /// Version the current value was computed for.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Unwrap into the current value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Replace the value wholesale unless `version` is older than the stored one.
    ///
    /// Returns `true` if the value was stored. Equal versions replace, so a recomputation
    /// for the same version wins over the previous one.
    pub fn apply(&mut self, version: u64, value: T) -> bool {
        if version < self.version {
            tracing::debug!(
                stale = version,
                current = self.version,
                kind = std::any::type_name::<T>(),
                "dropping stale result"
            );
            return false;
        }
        self.version = version;
        self.value = value;
        true
    }
}
