use serde::{Deserialize, Serialize};

/// Behaviour switches for a [`PanelController`](super::PanelController).
///
/// Every field has a default, so partial configs deserialize cleanly:
///
/// ```
/// use panelkit::PanelConfig;
///
/// let config = PanelConfig::default()
///     .destroy_on_transition_out(true)
///     .debug_transitions(true);
///
/// assert!(config.set_active_on_transition_in);
/// assert!(config.destroy_on_transition_out);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Activate the node at the start of every transition in.
    pub set_active_on_transition_in: bool,
    /// Deactivate the node once the exit animation finishes.
    pub set_inactive_on_transition_out: bool,
    /// Destroy the node once the exit animation finishes.
    pub destroy_on_transition_out: bool,
    /// Snap the panel out before starting a transition in from any other state.
    pub ensure_out_before_transition_in: bool,
    /// Bind and go (if unbound) as part of every transition in.
    pub ensure_reset_bind_go_on_transition_in: bool,
    /// Snap out and release the view when unbinding a visible panel.
    pub ensure_transition_out_on_unbind: bool,
    /// Label transition chains and log their start and end.
    pub debug_transitions: bool,
    /// Allow the parent node's panel to serve as this node's view.
    pub can_use_parent_panel: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            set_active_on_transition_in: true,
            set_inactive_on_transition_out: true,
            destroy_on_transition_out: false,
            ensure_out_before_transition_in: false,
            ensure_reset_bind_go_on_transition_in: true,
            ensure_transition_out_on_unbind: false,
            debug_transitions: false,
            can_use_parent_panel: true,
        }
    }
}

impl PanelConfig {
    pub fn set_active_on_transition_in(mut self, value: bool) -> Self {
        self.set_active_on_transition_in = value;
        self
    }

    pub fn set_inactive_on_transition_out(mut self, value: bool) -> Self {
        self.set_inactive_on_transition_out = value;
        self
    }

    pub fn destroy_on_transition_out(mut self, value: bool) -> Self {
        self.destroy_on_transition_out = value;
        self
    }

    pub fn ensure_out_before_transition_in(mut self, value: bool) -> Self {
        self.ensure_out_before_transition_in = value;
        self
    }

    pub fn ensure_reset_bind_go_on_transition_in(mut self, value: bool) -> Self {
        self.ensure_reset_bind_go_on_transition_in = value;
        self
    }

    pub fn ensure_transition_out_on_unbind(mut self, value: bool) -> Self {
        self.ensure_transition_out_on_unbind = value;
        self
    }

    pub fn debug_transitions(mut self, value: bool) -> Self {
        self.debug_transitions = value;
        self
    }

    pub fn can_use_parent_panel(mut self, value: bool) -> Self {
        self.can_use_parent_panel = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: PanelConfig = serde_json::from_str(
            r#"{ "destroy_on_transition_out": true, "can_use_parent_panel": false }"#,
        )
        .unwrap();

        assert_eq!(
            config,
            PanelConfig::default()
                .destroy_on_transition_out(true)
                .can_use_parent_panel(false)
        );
    }

    #[test]
    fn empty_object_is_default() {
        let config: PanelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PanelConfig::default());
        assert!(config.ensure_reset_bind_go_on_transition_in);
        assert!(!config.ensure_transition_out_on_unbind);
    }
}
