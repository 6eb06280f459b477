use crate::{LogFilter, StatusPolicy};

/// Arguments of an instantiation, kept by the instance so an emulated `reset` can create an
/// identical native instance.
#[derive(Debug, Clone, Default)]
pub struct InstanceOptions {
    /// Whether the FMU may show an interactive window.
    pub visible: bool,
    /// Enable debug logging in the FMU for all categories.
    pub logging_on: bool,
    /// Messages the logger callback forwards to the `log` facade.
    pub log_filter: LogFilter,
    /// Overrides the model's default [`StatusPolicy`].
    pub policy: Option<StatusPolicy>,
    /// FMI 3.0 Co-Simulation: the importer will use Event Mode.
    pub event_mode_used: bool,
    /// FMI 3.0 Co-Simulation: the importer can handle an early return from `do_step`.
    pub early_return_allowed: bool,
    /// Ask for an early return whenever the FMU offers one in an intermediate update.
    pub request_early_return: bool,
    /// FMI 3.0 Co-Simulation: variables the importer may access during an intermediate update.
    pub required_intermediate_variables: Vec<u32>,
}

impl InstanceOptions {
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn logging_on(mut self, logging_on: bool) -> Self {
        self.logging_on = logging_on;
        self
    }

    pub fn log_filter(mut self, log_filter: LogFilter) -> Self {
        self.log_filter = log_filter;
        self
    }

    pub fn policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn event_mode_used(mut self, event_mode_used: bool) -> Self {
        self.event_mode_used = event_mode_used;
        self
    }

    /// Allow the FMU to return early from `do_step`, and request it on every opportunity if
    /// `request` is set.
    pub fn early_return(mut self, allowed: bool, request: bool) -> Self {
        self.early_return_allowed = allowed;
        self.request_early_return = request;
        self
    }

    /// An early return is requested only when it is both allowed and elected.
    pub(crate) fn elects_early_return(&self) -> bool {
        self.early_return_allowed && self.request_early_return
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = InstanceOptions::default()
            .logging_on(true)
            .policy(StatusPolicy::STRICT)
            .early_return(false, true);
        assert!(options.logging_on);
        assert_eq!(options.policy, Some(StatusPolicy::STRICT));
        assert!(!options.elects_early_return());
        assert!(options.early_return(true, true).elects_early_return());
    }
}
