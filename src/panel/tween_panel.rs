use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::{Panel, PanelDirection};
use crate::transition::{Easing, OnTransitionFrame, Tween};

/// The animated panel surface.
///
/// Tracks a single `visibility` value (0.0 = fully out, 1.0 = fully in) that
/// hosts read when drawing, plus a slide vector for panels that move in from
/// an edge.
///
/// # Example
///
/// ```
/// use panelkit::{Easing, TweenPanel, Vec2};
///
/// let panel = TweenPanel::new()
///     .duration_in(0.4)
///     .easing_in(Easing::EaseInOut)
///     .slide(Vec2::new(0.0, -120.0));
///
/// // Fully out: shifted by the whole slide vector.
/// assert_eq!(panel.offset(), Vec2::new(0.0, -120.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenPanel {
    /// Seconds for the IN animation.
    pub duration_in: f32,
    /// Seconds for the OUT animation.
    pub duration_out: f32,
    pub easing_in: Easing,
    pub easing_out: Easing,
    /// Offset applied when fully out.
    pub slide: Vec2,
    #[serde(skip)]
    visibility: f32,
}

impl Default for TweenPanel {
    fn default() -> Self {
        Self {
            duration_in: 0.25,
            duration_out: 0.25,
            easing_in: Easing::EaseOut,
            easing_out: Easing::EaseIn,
            slide: Vec2::ZERO,
            visibility: 0.0,
        }
    }
}

impl TweenPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration_in(mut self, seconds: f32) -> Self {
        self.duration_in = seconds;
        self
    }

    pub fn duration_out(mut self, seconds: f32) -> Self {
        self.duration_out = seconds;
        self
    }

    /// Use the same duration for both directions.
    pub fn duration(self, seconds: f32) -> Self {
        self.duration_in(seconds).duration_out(seconds)
    }

    pub fn easing_in(mut self, easing: Easing) -> Self {
        self.easing_in = easing;
        self
    }

    pub fn easing_out(mut self, easing: Easing) -> Self {
        self.easing_out = easing;
        self
    }

    pub fn slide(mut self, slide: Vec2) -> Self {
        self.slide = slide;
        self
    }

    /// 0.0 when fully out, 1.0 when fully in.
    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    /// Opacity to draw with; currently the same as visibility.
    pub fn alpha(&self) -> f32 {
        self.visibility
    }

    /// Current slide offset.
    pub fn offset(&self) -> Vec2 {
        self.slide * (1.0 - self.visibility)
    }

    pub(crate) fn set_visibility(&mut self, visibility: f32) {
        self.visibility = visibility.clamp(0.0, 1.0);
    }

    /// Build (but do not start) the animation for `direction` on `host`.
    pub(crate) fn prepare(
        &self,
        host: Entity,
        direction: PanelDirection,
        on_frame: Option<OnTransitionFrame>,
    ) -> Tween {
        let (duration, easing) = match direction {
            PanelDirection::In => (self.duration_in, self.easing_in),
            PanelDirection::Out => (self.duration_out, self.easing_out),
        };

        Tween::new(duration)
            .easing(easing)
            .on_frame(on_frame)
            .on_update(move |graph, progress| {
                let visibility = match direction {
                    PanelDirection::In => progress,
                    PanelDirection::Out => 1.0 - progress,
                };
                if let Ok(Panel::Tween(panel)) =
                    graph.world_mut().query_one_mut::<&mut Panel>(host)
                {
                    panel.set_visibility(visibility);
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_visibility() {
        let mut panel = TweenPanel::new().slide(Vec2::new(100.0, 0.0));
        panel.set_visibility(0.25);
        assert_eq!(panel.offset(), Vec2::new(75.0, 0.0));
        panel.set_visibility(1.0);
        assert_eq!(panel.offset(), Vec2::ZERO);
    }

    #[test]
    fn visibility_is_clamped() {
        let mut panel = TweenPanel::new();
        panel.set_visibility(4.0);
        assert_eq!(panel.visibility(), 1.0);
        panel.set_visibility(-1.0);
        assert_eq!(panel.alpha(), 0.0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let panel: TweenPanel =
            serde_json::from_str(r#"{ "duration_in": 0.5, "slide": [0.0, 40.0] }"#).unwrap();
        assert_eq!(panel.duration_in, 0.5);
        assert_eq!(panel.duration_out, 0.25);
        assert_eq!(panel.slide, Vec2::new(0.0, 40.0));
        assert_eq!(panel.visibility(), 0.0);
    }
}
