use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a panel is in its show/hide lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelState {
    #[default]
    Out,
    TransitioningIn,
    In,
    TransitioningOut,
}

impl PanelState {
    /// `In` or `TransitioningIn`.
    pub fn is_in_or_transitioning_in(self) -> bool {
        matches!(self, PanelState::In | PanelState::TransitioningIn)
    }

    /// `Out` or `TransitioningOut`.
    pub fn is_out_or_transitioning_out(self) -> bool {
        matches!(self, PanelState::Out | PanelState::TransitioningOut)
    }

    /// `true` for the two resting states.
    pub fn is_settled(self) -> bool {
        matches!(self, PanelState::In | PanelState::Out)
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelState::Out => "out",
            PanelState::TransitioningIn => "transitioning-in",
            PanelState::In => "in",
            PanelState::TransitioningOut => "transitioning-out",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_partition_states() {
        for state in [
            PanelState::Out,
            PanelState::TransitioningIn,
            PanelState::In,
            PanelState::TransitioningOut,
        ] {
            assert_ne!(
                state.is_in_or_transitioning_in(),
                state.is_out_or_transitioning_out()
            );
        }
        assert_eq!(PanelState::default(), PanelState::Out);
        assert_eq!(PanelState::TransitioningOut.to_string(), "transitioning-out");
    }
}
