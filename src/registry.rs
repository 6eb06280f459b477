//! The set of live native instances owned by a model.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, InterfaceType, NativeHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub handle: NativeHandle,
    pub name: String,
    pub interface: InterfaceType,
}

/// Live instances of one model, keyed by native handle.
///
/// The lock is only held for the duration of a single registry operation and never across a
/// native call, so callbacks fired from inside an FMU call may look instances up.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<Vec<RegistryEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<RegistryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a freshly instantiated handle. A handle may be wrapped by at most one instance.
    pub fn register(&self, entry: RegistryEntry) -> Result<(), Error> {
        let mut entries = self.entries();
        if entries.iter().any(|e| e.handle == entry.handle) {
            return Err(Error::Consistency(format!(
                "{:?} ('{}') is already registered",
                entry.handle, entry.name
            )));
        }
        log::trace!("Registered {:?} '{}'", entry.handle, entry.name);
        entries.push(entry);
        Ok(())
    }

    /// Remove the single entry for `handle`.
    ///
    /// Zero or several matches indicate a double free or a use after free.
    pub fn deregister(&self, handle: NativeHandle) -> Result<RegistryEntry, Error> {
        let mut entries = self.entries();
        let matches = entries.iter().filter(|e| e.handle == handle).count();
        if matches != 1 {
            log::error!("Registry holds {matches} entries for {handle:?}, expected exactly one");
            return Err(Error::Consistency(format!(
                "registry holds {matches} entries for {handle:?}, expected exactly one"
            )));
        }
        let pos = entries
            .iter()
            .position(|e| e.handle == handle)
            .ok_or_else(|| Error::Consistency(format!("{handle:?} vanished from the registry")))?;
        let entry = entries.remove(pos);
        log::trace!("Deregistered {:?} '{}'", entry.handle, entry.name);
        Ok(entry)
    }

    pub fn lookup(&self, handle: NativeHandle) -> Option<RegistryEntry> {
        self.entries().iter().find(|e| e.handle == handle).cloned()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<RegistryEntry> {
        self.entries().iter().find(|e| e.name == name).cloned()
    }

    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.entries().iter().any(|e| e.handle == handle)
    }

    pub fn handles(&self) -> Vec<NativeHandle> {
        self.entries().iter().map(|e| e.handle).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
