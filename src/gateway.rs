//! Native call gateway: resolves the entry point and the instance handle, gates the call
//! through the state machine and settles the returned status.

use std::{ffi::c_void, fmt};

use crate::{
    lifecycle::{Gate, Guard, Lifecycle},
    Error, Status,
};

/// Address of a native instance (`fmi2Component` / `fmi3Instance`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(usize);

impl NativeHandle {
    /// `None` for a null pointer
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        (!ptr.is_null()).then_some(Self(ptr as usize))
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }

    #[inline]
    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:#x})", self.0)
    }
}

/// An entry point that is absent from the table is never invoked.
pub(crate) fn entry<F: Copy>(entry: Option<F>, function: &'static str) -> Result<F, Error> {
    entry.ok_or_else(|| {
        log::error!("`{function}` is not exported by this FMU");
        Error::Unsupported(function)
    })
}

/// The live native pointer, or `Error::Freed` after the instance was freed.
pub(crate) fn handle(
    handle: Option<NativeHandle>,
    function: &'static str,
) -> Result<*mut c_void, Error> {
    handle.map(NativeHandle::as_ptr).ok_or_else(|| {
        log::error!("`{function}` called on a freed instance");
        Error::Freed(function)
    })
}

pub(crate) fn check_len(function: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            function,
            expected,
            found,
        })
    }
}

/// Run one guarded native call.
///
/// The handle is checked first so a freed instance fails closed even for soft calls. A soft
/// call from an illegal state returns `Ok` without touching the entry point.
pub(crate) fn invoke<F, S>(
    lifecycle: &mut Lifecycle,
    native: Option<NativeHandle>,
    guard: Guard,
    entry_point: Option<F>,
    call: impl FnOnce(F, *mut c_void) -> S,
) -> Result<Status, Error>
where
    F: Copy,
    S: Into<Status>,
{
    let ptr = handle(native, guard.function)?;
    if lifecycle.gate(&guard)? == Gate::Bypass {
        return Ok(Status::Ok);
    }
    let f = entry(entry_point, guard.function)?;
    log::trace!("{}({ptr:?})", guard.function);
    let status = call(f, ptr).into();
    lifecycle.settle(&guard, status)
}
