//! Decoding and classification of the status codes returned by native FMI calls.

use std::fmt;

/// A native status code, decoded independently of the FMI version that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// All well.
    Ok,
    /// Things are not quite right, but the computation can continue.
    Warning,
    /// The call could not be completed as requested, but the instance is still usable. For
    /// stepping calls the importer should retry with a smaller step or terminate.
    Discard,
    /// The call failed and the simulation must not be continued with this instance, unless a
    /// previously saved FMU state is restored or the instance is reset.
    Error,
    /// The model computations are irreparably corrupted for all instances.
    Fatal,
    /// FMI 2.0 asynchronous co-simulation only: the step was started and has not finished yet.
    Pending,
}

/// The caller contract attached to a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok,
    Warning,
    Discard,
    Error,
    Fatal,
}

impl Status {
    pub fn severity(self) -> Severity {
        match self {
            Status::Ok | Status::Pending => Severity::Ok,
            Status::Warning => Severity::Warning,
            Status::Discard => Severity::Discard,
            Status::Error => Severity::Error,
            Status::Fatal => Severity::Fatal,
        }
    }

    /// Whether the call counts as successful for the purpose of state transitions.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self.severity(), Severity::Ok | Severity::Warning)
    }

    /// Log level used when an FMU reports a message with this status.
    pub fn log_level(self) -> log::Level {
        match self {
            Status::Ok | Status::Pending => log::Level::Info,
            Status::Warning => log::Level::Warn,
            Status::Discard => log::Level::Trace,
            Status::Error | Status::Fatal => log::Level::Error,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::Warning => "Warning",
            Status::Discard => "Discard",
            Status::Error => "Error",
            Status::Fatal => "Fatal",
            Status::Pending => "Pending",
        };
        f.write_str(name)
    }
}

/// Caller-configurable strictness deciding which statuses are raised as [`crate::Error`].
///
/// `Discard` is never raised on its own and `Fatal` is always raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub raise_on_warning: bool,
    pub raise_on_error: bool,
}

impl StatusPolicy {
    /// Raise on warnings and errors.
    pub const STRICT: Self = Self {
        raise_on_warning: true,
        raise_on_error: true,
    };

    /// Only fatal statuses are raised; the caller inspects every returned status.
    pub const LENIENT: Self = Self {
        raise_on_warning: false,
        raise_on_error: false,
    };
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            raise_on_warning: false,
            raise_on_error: true,
        }
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    /// The status must be surfaced as an error rather than returned.
    pub raise: bool,
}

/// Map a status to its severity and decide, under `policy`, whether it is raised.
pub fn classify(status: Status, policy: &StatusPolicy) -> Classification {
    let severity = status.severity();
    let raise = match severity {
        Severity::Ok | Severity::Discard => false,
        Severity::Warning => policy.raise_on_warning,
        Severity::Error => policy.raise_on_error,
        Severity::Fatal => true,
    };
    Classification { severity, raise }
}

/// A decoded status together with the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Name of the native function, e.g. `fmi3DoStep`
    pub function: &'static str,
    /// Name of the instance the call was made on
    pub instance: String,
    pub status: Status,
    pub severity: Severity,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` on instance '{}' returned {}",
            self.function, self.instance, self.status
        )
    }
}
