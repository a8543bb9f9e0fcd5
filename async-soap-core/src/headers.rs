//! Output header slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Caller-owned cell that receives the output headers of a call.
///
/// The caller keeps one handle and passes a clone into the call. The client
/// stores the decoded headers only when the response decodes successfully, and
/// does so before the call future completes; on every failure path the slot
/// keeps whatever it held before the call.
///
/// ```
/// use async_soap_core::HeaderSlot;
///
/// let slot: HeaderSlot<Vec<String>> = HeaderSlot::new();
/// let handle = slot.clone();
/// handle.store(vec!["session-id".to_string()]);
/// assert_eq!(slot.take(), Some(vec!["session-id".to_string()]));
/// ```
#[derive(Debug)]
pub struct HeaderSlot<H> {
    inner: Arc<Mutex<Option<H>>>,
}

impl<H> HeaderSlot<H> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a slot holding an initial value.
    pub fn with_value(value: H) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(value))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the slot contents.
    pub fn store(&self, value: H) {
        *self.lock() = Some(value);
    }

    /// Take the contents, leaving the slot empty.
    pub fn take(&self) -> Option<H> {
        self.lock().take()
    }

    /// Whether the slot currently holds a value.
    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    /// Inspect the contents without taking them.
    pub fn with<R>(&self, f: impl FnOnce(Option<&H>) -> R) -> R {
        f(self.lock().as_ref())
    }
}

impl<H: Clone> HeaderSlot<H> {
    /// Clone the current contents.
    pub fn get(&self) -> Option<H> {
        self.lock().clone()
    }
}

impl<H> Clone for HeaderSlot<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Default for HeaderSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: HeaderSlot<u32> = HeaderSlot::new();
        assert!(!slot.is_set());
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn test_clones_share_contents() {
        let slot = HeaderSlot::with_value(1u32);
        let other = slot.clone();
        other.store(2);
        assert_eq!(slot.get(), Some(2));
        assert_eq!(slot.with(|v| v.copied()), Some(2));
    }

    #[test]
    fn test_take_empties_slot() {
        let slot = HeaderSlot::with_value("token".to_string());
        assert_eq!(slot.take().as_deref(), Some("token"));
        assert!(!slot.is_set());
    }
}
