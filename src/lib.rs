//! # panelkit
//!
//! **Panel lifecycle controllers and composable transitions for `hecs` scene graphs.**
//!
//! Bind a presenter to a model, animate it in, swap the model, animate it out.
//! The controller keeps one consistent panel state however those requests
//! interleave.
//!
//! ## Quick Start
//!
//! ```
//! use panelkit::*;
//!
//! let mut graph = SceneGraph::new();
//! let hud = graph.spawn("hud");
//! let menu = graph.spawn_child(hud, "menu")?;
//! graph.insert(menu, Panel::Tween(TweenPanel::new().duration(0.3).slide(Vec2::new(0.0, -40.0))))?;
//!
//! let panel = PanelController::attach(&mut graph, menu, NoModel, PanelConfig::default())?;
//! panel.transition_in(&mut graph);
//!
//! // Drive everything from your frame loop.
//! for _ in 0..20 {
//!     graph.tick(1.0 / 60.0);
//! }
//! assert_eq!(panel.state(&graph), PanelState::In);
//!
//! panel.transition_out(&mut graph, true);
//! # Ok::<(), PanelError>(())
//! ```
//!
//! ## Pieces
//!
//! - **[`SceneGraph`]**: a thin `hecs` world with parent/child nodes and a frame tick.
//! - **[`Transition`]**: start/tick/complete-early units composed with [`Chain`],
//!   [`Join`], [`Conditional`] and [`Guarded`].
//! - **[`Panel`]**: what actually animates: a [`TweenPanel`] or a no-op [`StubPanel`].
//! - **[`PanelController`]**: the state machine tying a [`Presenter`] to its panel.

mod controller;
mod error;
mod graph;
pub mod panel;
mod transition;

pub use controller::{BindContext, NoModel, PanelConfig, PanelController, PanelState, Presenter};
pub use error::PanelError;
pub use graph::{Node, SceneGraph};
pub use panel::{Panel, PanelDirection, PanelSource, StubPanel, TweenPanel};
pub use transition::{
    BoxedTransition, Chain, Conditional, Easing, Guarded, InstantAction, Join, OnTransitionFrame,
    Predicate, Transition, TransitionStatus, Tween,
};

// Re-export glam math types for convenience
pub use glam::Vec2;

// Node handles
pub use hecs::{Entity, World};
