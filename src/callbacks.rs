//! State shared between an instance and the callbacks its FMU invokes.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use crate::{NativeHandle, Registry, Status};

/// Set of statuses, one bit per [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMask(u8);

impl StatusMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b11_1111);
    /// Everything but `Ok` and `Pending`
    pub const PROBLEMS: Self = Self(0b01_1110);

    const fn bit(status: Status) -> u8 {
        match status {
            Status::Ok => 1 << 0,
            Status::Warning => 1 << 1,
            Status::Discard => 1 << 2,
            Status::Error => 1 << 3,
            Status::Fatal => 1 << 4,
            Status::Pending => 1 << 5,
        }
    }

    pub fn contains(self, status: Status) -> bool {
        self.0 & Self::bit(status) != 0
    }

    pub fn with(self, status: Status) -> Self {
        Self(self.0 | Self::bit(status))
    }

    pub fn without(self, status: Status) -> Self {
        Self(self.0 & !Self::bit(status))
    }
}

impl Default for StatusMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<Status> for StatusMask {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Per-instance filter applied to messages received through the logger callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Enabled log categories, `None` enables every category.
    pub categories: Option<Vec<String>>,
    pub statuses: StatusMask,
}

impl LogFilter {
    pub fn new<I, S>(categories: I, statuses: StatusMask) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: Some(categories.into_iter().map(Into::into).collect()),
            statuses,
        }
    }

    pub fn allows(&self, status: Status, category: &str) -> bool {
        self.statuses.contains(status)
            && self
                .categories
                .as_ref()
                .map_or(true, |enabled| enabled.iter().any(|c| c == category))
    }
}

/// The memory the FMU's instance environment pointer refers to.
///
/// It is boxed by the owning instance so its address stays stable for the lifetime of the
/// native instance. Callbacks only read it or write its atomics; the state machine is never
/// touched from inside a callback.
#[derive(Debug)]
pub(crate) struct InstanceEnvironment {
    name: String,
    filter: LogFilter,
    registry: Arc<Registry>,
    /// Address of the native instance, 0 while none is live
    handle: AtomicUsize,
    early_return: bool,
    step_finished: Mutex<Option<Status>>,
    intermediate_updates: AtomicUsize,
    clock_updates: AtomicUsize,
    early_return_requested: AtomicBool,
}

impl InstanceEnvironment {
    pub fn new(name: &str, filter: LogFilter, registry: Arc<Registry>, early_return: bool) -> Self {
        Self {
            name: name.to_owned(),
            filter,
            registry,
            handle: AtomicUsize::new(0),
            early_return,
            step_finished: Mutex::new(None),
            intermediate_updates: AtomicUsize::new(0),
            clock_updates: AtomicUsize::new(0),
            early_return_requested: AtomicBool::new(false),
        }
    }

    pub fn set_handle(&self, handle: Option<NativeHandle>) {
        self.handle
            .store(handle.map_or(0, NativeHandle::addr), Ordering::Release);
    }

    pub fn handle(&self) -> Option<NativeHandle> {
        NativeHandle::from_ptr(self.handle.load(Ordering::Acquire) as *mut std::ffi::c_void)
    }

    /// The instance this environment belongs to is currently registered with its model.
    pub fn is_live(&self) -> bool {
        self.handle()
            .is_some_and(|handle| self.registry.contains(handle))
    }

    /// Forward a message from the FMU to the `log` facade, with the instance name as target.
    pub fn log(&self, status: Status, category: &str, message: &str) {
        if !self.filter.allows(status, category) {
            return;
        }
        log::logger().log(
            &log::Record::builder()
                .args(format_args!("[{category}] {message}"))
                .level(status.log_level())
                .module_path(Some("fmu"))
                .target(&self.name)
                .build(),
        );
    }

    pub fn record_step_finished(&self, status: Status) {
        log::trace!("Instance '{}': asynchronous step finished with {status}", self.name);
        *self
            .step_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    pub fn take_step_finished(&self) -> Option<Status> {
        self.step_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Record an intermediate update and decide whether to ask the FMU to return early.
    pub fn intermediate_update(&self, time: f64, can_return_early: bool) -> bool {
        self.intermediate_updates.fetch_add(1, Ordering::Relaxed);
        let request = self.early_return && can_return_early && self.is_live();
        log::trace!(
            "Instance '{}': intermediate update at t={time}, early return requested: {request}",
            self.name
        );
        if request {
            self.early_return_requested.store(true, Ordering::Relaxed);
        }
        request
    }

    pub fn intermediate_updates(&self) -> usize {
        self.intermediate_updates.load(Ordering::Relaxed)
    }

    /// Whether an early return was requested since the last call.
    pub fn take_early_return_requested(&self) -> bool {
        self.early_return_requested.swap(false, Ordering::Relaxed)
    }

    pub fn record_clock_update(&self) {
        let count = self.clock_updates.fetch_add(1, Ordering::Relaxed) + 1;
        log::trace!("Instance '{}': clock update #{count}", self.name);
    }

    pub fn clock_updates(&self) -> usize {
        self.clock_updates.load(Ordering::Relaxed)
    }
}
