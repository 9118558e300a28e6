//! Process-wide instance-ID allocation.
//!
//! Every attached device gets the smallest unused non-negative ID, unique
//! among live devices and reused after release. One lock guards the whole
//! table: allocation and release are rare, O(live instances), and must be
//! strictly serialized so a released ID can never be handed out while a
//! holder still exists. The registry lock is independent of any device
//! lock and is never held across a bus transaction.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::error::RegistryError;

/// What the registry records about one live instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceToken {
    /// Physical bus address of the device.
    pub bus_address: u8,
    /// Label the device was attached under.
    pub label: String,
}

/// Allocation table mapping live instance IDs to their tokens.
///
/// The process-wide table is reached through [`with_instances`];
/// free-standing tables exist mainly so tests can run in isolation.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<u32, InstanceToken>,
}

impl InstanceRegistry {
    /// Creates an empty allocation table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }

    /// Allocates the smallest unused ID and records `token` under it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Exhausted`] if every ID is live.
    pub fn allocate(&mut self, token: InstanceToken) -> Result<u32, RegistryError> {
        // Keys iterate in order, so the first gap is the smallest free ID.
        let mut id: u32 = 0;
        for &used in self.instances.keys() {
            if used != id {
                break;
            }
            id = id.checked_add(1).ok_or(RegistryError::Exhausted)?;
        }
        self.instances.insert(id, token);
        Ok(id)
    }

    /// Releases `id`, returning its token and making the ID eligible for
    /// reuse. `None` if the ID was not live.
    pub fn release(&mut self, id: u32) -> Option<InstanceToken> {
        self.instances.remove(&id)
    }

    /// The token registered under `id`, if live.
    #[must_use]
    pub fn token(&self, id: u32) -> Option<&InstanceToken> {
        self.instances.get(&id)
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// The process-wide instance table. Empty until the first attach.
static INSTANCES: Mutex<InstanceRegistry> = Mutex::new(InstanceRegistry::new());

/// Runs `f` with exclusive access to the process-wide instance table.
pub fn with_instances<R>(f: impl FnOnce(&mut InstanceRegistry) -> R) -> R {
    let mut guard = INSTANCES.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn token(label: &str) -> InstanceToken {
        InstanceToken {
            bus_address: 0x20,
            label: label.to_string(),
        }
    }

    #[test]
    fn ids_are_dense_from_zero() {
        let mut reg = InstanceRegistry::new();
        for expected in 0..4 {
            assert_eq!(reg.allocate(token("dev")).unwrap(), expected);
        }
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn released_id_fills_the_gap_first() {
        let mut reg = InstanceRegistry::new();
        for _ in 0..4 {
            reg.allocate(token("dev")).unwrap();
        }
        assert_eq!(reg.release(1).unwrap().label, "dev");
        // The gap is reused before any higher ID.
        assert_eq!(reg.allocate(token("dev")).unwrap(), 1);
        assert_eq!(reg.allocate(token("dev")).unwrap(), 4);
    }

    #[test]
    fn id_never_reused_while_held() {
        let mut reg = InstanceRegistry::new();
        let a = reg.allocate(token("a")).unwrap();
        let b = reg.allocate(token("b")).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.token(a).unwrap().label, "a");
        assert_eq!(reg.token(b).unwrap().label, "b");
    }

    #[test]
    fn release_unknown_id_is_none() {
        let mut reg = InstanceRegistry::new();
        assert!(reg.release(7).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn concurrent_allocations_are_distinct() {
        const THREADS: usize = 16;

        // All threads hold their IDs until everyone has allocated, so any
        // duplicate would mean two concurrently-live holders.
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let id = with_instances(|r| r.allocate(token("race"))).unwrap();
                    barrier.wait();
                    id
                })
            })
            .collect();

        let mut ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);

        for id in ids {
            with_instances(|r| r.release(id));
        }
    }
}
