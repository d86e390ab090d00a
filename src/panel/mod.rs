//! Animatable panel surfaces.
//!
//! A [`Panel`] is a component on a scene-graph node that knows how to play the
//! node's entrance and exit. It comes in two variants:
//!
//! - [`Panel::Tween`]: the real implementation ([`TweenPanel`])
//! - [`Panel::Stub`]: a no-op ([`StubPanel`]) for nodes with nothing to animate
//!
//! Controllers never create panels directly. They call [`resolve`], which
//! walks a fixed resolution order and attaches a default panel only when
//! nothing suitable exists.
//!
//! # Example
//!
//! ```
//! use panelkit::{Panel, PanelDirection, SceneGraph, Transition, TweenPanel, panel};
//!
//! let mut graph = SceneGraph::new();
//! let node = graph.spawn("toast");
//! graph.insert(node, Panel::Tween(TweenPanel::new().duration(0.5))).unwrap();
//!
//! let mut enter = panel::prepare_transition(&graph, node, PanelDirection::In, None);
//! enter.start(&mut graph);
//! enter.tick(&mut graph, 0.5);
//!
//! assert_eq!(panel::visibility(&graph, node), Some(1.0));
//! ```

mod stub;
mod tween_panel;

pub use stub::StubPanel;
pub use tween_panel::TweenPanel;

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::graph::SceneGraph;
use crate::transition::{BoxedTransition, InstantAction, OnTransitionFrame, Transition};

/// Which way a panel animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelDirection {
    /// Entrance.
    In,
    /// Exit.
    Out,
}

/// The animatable surface for one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Panel {
    Tween(TweenPanel),
    Stub(StubPanel),
}

impl Default for Panel {
    fn default() -> Self {
        Panel::Tween(TweenPanel::default())
    }
}

impl Panel {
    /// A stub panel that warns whenever it is used.
    pub fn stub() -> Self {
        Panel::Stub(StubPanel::default())
    }

    /// A stub panel that stays silent.
    pub fn silent_stub() -> Self {
        Panel::Stub(StubPanel::new(false))
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Panel::Stub(_))
    }
}

/// A panel's own running animation, started by [`start_transition`].
struct PanelAnimation(BoxedTransition);

// ============================================================================
// Resolution
// ============================================================================

/// Where a node's panel may come from, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelSource {
    /// The host found by an earlier resolution.
    Cached,
    /// A panel on the node itself.
    OnSelf,
    /// A panel on the node's parent.
    OnParent,
    /// A freshly attached default panel on the node.
    AttachDefault,
}

const RESOLUTION_ORDER: [PanelSource; 4] = [
    PanelSource::Cached,
    PanelSource::OnSelf,
    PanelSource::OnParent,
    PanelSource::AttachDefault,
];

/// Find the entity whose panel animates `node`.
///
/// Tries each [`PanelSource`] in order, skipping [`PanelSource::OnParent`]
/// unless `use_parent` is set. Returns `None` only if `node` is destroyed.
pub fn resolve(
    graph: &mut SceneGraph,
    node: Entity,
    cached: Option<Entity>,
    use_parent: bool,
) -> Option<Entity> {
    if !graph.contains(node) {
        return None;
    }

    for source in RESOLUTION_ORDER {
        let found = match source {
            PanelSource::Cached => cached.filter(|host| graph.has::<Panel>(*host)),
            PanelSource::OnSelf => Some(node).filter(|host| graph.has::<Panel>(*host)),
            PanelSource::OnParent if use_parent => {
                graph.parent(node).filter(|host| graph.has::<Panel>(*host))
            }
            PanelSource::OnParent => None,
            PanelSource::AttachDefault => {
                graph.insert(node, Panel::default()).ok().map(|_| node)
            }
        };

        if let Some(host) = found {
            tracing::trace!(path = %graph.path(node), ?source, "resolved panel");
            return Some(host);
        }
    }
    None
}

// ============================================================================
// Panel operations
// ============================================================================

/// Build the entrance or exit for the panel on `host` without starting it.
///
/// Hosts without a panel get an instantly completing transition.
pub fn prepare_transition(
    graph: &SceneGraph,
    host: Entity,
    direction: PanelDirection,
    on_frame: Option<OnTransitionFrame>,
) -> BoxedTransition {
    let panel = match graph.world().get::<&Panel>(host) {
        Ok(panel) => Panel::clone(&panel),
        Err(_) => return Box::new(InstantAction::done()),
    };

    match panel {
        Panel::Tween(tween) => Box::new(tween.prepare(host, direction, on_frame)),
        Panel::Stub(stub) => {
            stub.note_use(graph, host, "prepare_transition");
            Box::new(InstantAction::done())
        }
    }
}

/// Prepare and immediately run the panel's own animation.
///
/// The animation is advanced by [`SceneGraph::tick`]. A previous own animation
/// on the same host is completed early first.
pub fn start_transition(graph: &mut SceneGraph, host: Entity, direction: PanelDirection) {
    if let Ok(PanelAnimation(mut previous)) = graph.world_mut().remove_one::<PanelAnimation>(host)
    {
        previous.complete_early(graph);
    }

    if let Ok(Panel::Stub(stub)) = graph.world().get::<&Panel>(host).as_deref() {
        stub.note_use(graph, host, "start_transition");
        return;
    }

    let mut animation = prepare_transition(graph, host, direction, None);
    animation.start(graph);
    if !animation.is_complete() {
        let _ = graph.insert(host, PanelAnimation(animation));
    }
}

/// Snap the panel fully in, cancelling its own animation.
pub fn bring_in_immediate(graph: &mut SceneGraph, host: Entity) {
    snap(graph, host, 1.0, "bring_in_immediate");
}

/// Snap the panel fully out, cancelling its own animation.
pub fn dismiss_immediate(graph: &mut SceneGraph, host: Entity) {
    snap(graph, host, 0.0, "dismiss_immediate");
}

fn snap(graph: &mut SceneGraph, host: Entity, visibility: f32, operation: &str) {
    let _ = graph.world_mut().remove_one::<PanelAnimation>(host);

    let stub = match graph.world_mut().query_one_mut::<&mut Panel>(host) {
        Ok(Panel::Tween(panel)) => {
            panel.set_visibility(visibility);
            None
        }
        Ok(Panel::Stub(stub)) => Some(*stub),
        Err(_) => None,
    };
    if let Some(stub) = stub {
        stub.note_use(graph, host, operation);
    }
}

/// Visibility of the tween panel on `host`, if it has one.
pub fn visibility(graph: &SceneGraph, host: Entity) -> Option<f32> {
    match graph.world().get::<&Panel>(host).as_deref() {
        Ok(Panel::Tween(panel)) => Some(panel.visibility()),
        _ => None,
    }
}

/// Advance every panel's own animation. Called from [`SceneGraph::tick`].
pub(crate) fn tick_animations(graph: &mut SceneGraph, dt: f32) {
    let hosts: Vec<Entity> = graph
        .world_mut()
        .query_mut::<&PanelAnimation>()
        .into_iter()
        .map(|(host, _)| host)
        .collect();

    for host in hosts {
        let Ok(PanelAnimation(mut animation)) =
            graph.world_mut().remove_one::<PanelAnimation>(host)
        else {
            continue;
        };

        animation.tick(graph, dt);
        if !animation.is_complete() && !graph.has::<PanelAnimation>(host) {
            let _ = graph.insert(host, PanelAnimation(animation));
        }
    }
}
