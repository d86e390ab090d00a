//! Type-erased controller lifecycle.
//!
//! Everything here works on a node entity and its [`PanelCore`] component, so
//! transition steps and sub-panel propagation can drive any controller without
//! knowing its presenter type.

use hecs::Entity;

use super::active;
use super::config::PanelConfig;
use super::presenter::Hooks;
use super::state::PanelState;
use crate::graph::SceneGraph;
use crate::panel::{self, PanelDirection};
use crate::transition::{
    BoxedTransition, Chain, Conditional, Guarded, InstantAction, Join, OnTransitionFrame,
};

/// Controller bookkeeping stored on the node entity.
pub(crate) struct PanelCore {
    pub(crate) state: PanelState,
    pub(crate) config: PanelConfig,
    pub(crate) bound: bool,
    /// Entity whose panel animates this node, once resolved.
    pub(crate) view: Option<Entity>,
    pub(crate) subpanels: Vec<Entity>,
    pub(crate) on_in_frame: Option<OnTransitionFrame>,
    pub(crate) on_out_frame: Option<OnTransitionFrame>,
    pub(crate) hooks: Hooks,
}

impl PanelCore {
    pub(crate) fn new(config: PanelConfig, hooks: Hooks) -> Self {
        Self {
            state: PanelState::Out,
            config,
            bound: false,
            view: None,
            subpanels: Vec::new(),
            on_in_frame: None,
            on_out_frame: None,
            hooks,
        }
    }
}

pub(crate) fn read<R>(
    graph: &SceneGraph,
    node: Entity,
    f: impl FnOnce(&PanelCore) -> R,
) -> Option<R> {
    graph.world().get::<&PanelCore>(node).ok().map(|core| f(&*core))
}

pub(crate) fn write<R>(
    graph: &mut SceneGraph,
    node: Entity,
    f: impl FnOnce(&mut PanelCore) -> R,
) -> Option<R> {
    graph
        .world_mut()
        .query_one_mut::<&mut PanelCore>(node)
        .ok()
        .map(f)
}

// ============================================================================
// Queries
// ============================================================================

/// Current state; `Out` for destroyed or unmanaged nodes.
pub(crate) fn state(graph: &SceneGraph, node: Entity) -> PanelState {
    read(graph, node, |core| core.state).unwrap_or_default()
}

pub(crate) fn set_state(graph: &mut SceneGraph, node: Entity, state: PanelState) {
    let Some(previous) = write(graph, node, |core| std::mem::replace(&mut core.state, state))
    else {
        return;
    };
    if previous != state {
        tracing::debug!(
            frame = graph.frame(),
            path = %graph.path(node),
            from = %previous,
            to = %state,
            "panel state"
        );
    }
}

pub(crate) fn config(graph: &SceneGraph, node: Entity) -> Option<PanelConfig> {
    read(graph, node, |core| core.config.clone())
}

pub(crate) fn is_bound(graph: &SceneGraph, node: Entity) -> bool {
    read(graph, node, |core| core.bound).unwrap_or(false)
}

/// The cached view, if it still carries a panel.
pub(crate) fn view(graph: &SceneGraph, node: Entity) -> Option<Entity> {
    read(graph, node, |core| core.view)
        .flatten()
        .filter(|host| graph.has::<panel::Panel>(*host))
}

pub(crate) fn has_view(graph: &SceneGraph, node: Entity) -> bool {
    view(graph, node).is_some()
}

pub(crate) fn is_in_or_transitioning_in(graph: &SceneGraph, node: Entity) -> bool {
    has_view(graph, node) && state(graph, node).is_in_or_transitioning_in()
}

pub(crate) fn is_out_or_transitioning_out(graph: &SceneGraph, node: Entity) -> bool {
    has_view(graph, node) && state(graph, node).is_out_or_transitioning_out()
}

/// Resolve and cache the view.
pub(crate) fn ensure_view(graph: &mut SceneGraph, node: Entity) -> Option<Entity> {
    let (cached, use_parent) = read(graph, node, |core| {
        (core.view, core.config.can_use_parent_panel)
    })?;
    let view = panel::resolve(graph, node, cached, use_parent)?;
    write(graph, node, |core| core.view = Some(view));
    Some(view)
}

// ============================================================================
// Binding lifecycle
// ============================================================================

pub(crate) fn bind(graph: &mut SceneGraph, node: Entity) {
    let Some((bound, hooks)) = read(graph, node, |core| (core.bound, core.hooks)) else {
        return;
    };
    if bound {
        return;
    }

    write(graph, node, |core| core.bound = true);
    let subpanels = (hooks.bind)(graph, node);
    add_subpanels(graph, node, &subpanels);
    tracing::trace!(path = %graph.path(node), "bound");
}

pub(crate) fn unbind(graph: &mut SceneGraph, node: Entity) {
    let Some((bound, config, hooks)) =
        read(graph, node, |core| (core.bound, core.config.clone(), core.hooks))
    else {
        return;
    };
    if !bound {
        return;
    }

    let ensure_out = config.ensure_transition_out_on_unbind;
    if ensure_out && has_view(graph, node) && state(graph, node) != PanelState::Out {
        let out = prepare_transition_out(graph, node, false);
        active::run_as_active(graph, node, out, true);
        write(graph, node, |core| core.view = None);
    }

    write(graph, node, |core| core.subpanels.clear());
    if ensure_out {
        set_state(graph, node, PanelState::Out);
    }

    (hooks.unbind)(graph, node);
    write(graph, node, |core| core.bound = false);
    tracing::trace!(path = %graph.path(node), "unbound");
}

/// Drop the cached view, run the reset hook, then resolve the view again.
pub(crate) fn reset(graph: &mut SceneGraph, node: Entity) {
    let Some(hooks) = write(graph, node, |core| {
        core.view = None;
        core.hooks
    }) else {
        return;
    };
    (hooks.reset)(graph, node);
    ensure_view(graph, node);
}

pub(crate) fn go(graph: &mut SceneGraph, node: Entity) {
    if let Some(hooks) = read(graph, node, |core| core.hooks) {
        (hooks.go)(graph, node);
    }
}

/// Register child controllers. Ignored while unbound.
///
/// Entities without a controller, duplicates, and entries that would make the
/// sub-panel relation cyclic are skipped.
pub(crate) fn add_subpanels(graph: &mut SceneGraph, node: Entity, subpanels: &[Entity]) {
    if subpanels.is_empty() {
        return;
    }
    if !is_bound(graph, node) {
        tracing::trace!(path = %graph.path(node), "ignoring sub-panels while unbound");
        return;
    }

    for &sub in subpanels {
        if !graph.has::<PanelCore>(sub) {
            continue;
        }
        if reaches(graph, sub, node) {
            tracing::warn!(
                path = %graph.path(node),
                subpanel = %graph.path(sub),
                "refusing cyclic sub-panel"
            );
            continue;
        }
        write(graph, node, |core| {
            if !core.subpanels.contains(&sub) {
                core.subpanels.push(sub);
            }
        });
    }
}

/// `true` if `target` is `from` or one of its transitive sub-panels.
fn reaches(graph: &SceneGraph, from: Entity, target: Entity) -> bool {
    let mut stack = vec![from];
    let mut seen = Vec::new();
    while let Some(e) = stack.pop() {
        if e == target {
            return true;
        }
        if seen.contains(&e) {
            continue;
        }
        seen.push(e);
        if let Some(children) = read(graph, e, |core| core.subpanels.clone()) {
            stack.extend(children);
        }
    }
    false
}

// ============================================================================
// Immediate operations
// ============================================================================

/// Snap out synchronously. Does not cancel the active transition.
pub(crate) fn dismiss_immediate(graph: &mut SceneGraph, node: Entity) {
    let Some(config) = config(graph, node) else {
        return;
    };

    if let Some(view) = ensure_view(graph, node) {
        panel::dismiss_immediate(graph, view);
    }
    if config.destroy_on_transition_out {
        graph.destroy(node);
        return;
    }
    if config.set_inactive_on_transition_out {
        graph.set_active(node, false);
    }
    set_state(graph, node, PanelState::Out);
}

// ============================================================================
// Transition builders
// ============================================================================

fn chain(graph: &SceneGraph, node: Entity, config: &PanelConfig, suffix: &str) -> Chain {
    if config.debug_transitions {
        Chain::named(format!("{}-{suffix}", graph.path(node)))
    } else {
        Chain::new()
    }
}

/// The entrance sequence, guarded on the node's liveness.
///
/// Structural switches are read now; `ensure_out_before_transition_in` is
/// read when its step runs.
pub(crate) fn prepare_transition_in(
    graph: &SceneGraph,
    node: Entity,
    force_bind_go: bool,
) -> BoxedTransition {
    let Some(config) = config(graph, node) else {
        return Box::new(InstantAction::done());
    };

    let mut steps = chain(graph, node, &config, "in");

    if config.set_active_on_transition_in {
        steps = steps.action(move |g| g.set_active(node, true));
    }

    steps = steps.action(move |g| {
        if !is_bound(g, node) {
            reset(g, node);
        }
        let ensure_out = config_flag(g, node, |c| c.ensure_out_before_transition_in);
        if state(g, node) != PanelState::Out && ensure_out {
            dismiss_immediate(g, node);
        }
        set_state(g, node, PanelState::TransitioningIn);
    });

    if config.ensure_reset_bind_go_on_transition_in || force_bind_go {
        steps = steps.action(move |g| {
            if !is_bound(g, node) {
                bind(g, node);
                go(g, node);
            }
        });
    }

    if config.set_active_on_transition_in {
        steps = steps.action(move |g| g.set_active(node, true));
    }

    let steps = steps
        .then_deferred(move |g| prepare_panel_transition_in(g, node))
        .action(move |g| set_state(g, node, PanelState::In));

    Box::new(Guarded::new(node, steps))
}

/// The exit sequence, joined with every sub-panel's exit.
///
/// Empty unless the node is alive and has a view; the whole sequence is
/// guarded on liveness and on still having a view.
pub(crate) fn prepare_transition_out(
    graph: &SceneGraph,
    node: Entity,
    unbind_after: bool,
) -> BoxedTransition {
    let Some(config) = config(graph, node) else {
        return Box::new(InstantAction::done());
    };

    let mut steps = chain(graph, node, &config, "out");

    if graph.contains(node) && has_view(graph, node) {
        let exit = Chain::new()
            .action(move |g| set_state(g, node, PanelState::TransitioningOut))
            .then_deferred(move |g| prepare_panel_transition_out(g, node))
            .action(move |g| {
                if g.contains(node)
                    && config_flag(g, node, |c| c.set_inactive_on_transition_out)
                {
                    g.set_active(node, false);
                }
            });

        steps = steps
            .then(Conditional::new(move |g| has_view(g, node), exit))
            .action(move |g| {
                if unbind_after {
                    unbind(g, node);
                }
            })
            .action(move |g| set_state(g, node, PanelState::Out))
            .action(move |g| {
                if g.contains(node) && config_flag(g, node, |c| c.destroy_on_transition_out) {
                    g.destroy(node);
                }
            });
    }

    Box::new(Guarded::new(node, steps).when(move |g| has_view(g, node)))
}

/// Transition in only when there is a view that is not already in.
pub(crate) fn ensure_transition_in(graph: &SceneGraph, node: Entity) -> BoxedTransition {
    let enter = prepare_transition_in(graph, node, false);
    Box::new(Conditional::new(
        move |g| has_view(g, node) && !is_in_or_transitioning_in(g, node),
        enter,
    ))
}

fn config_flag(graph: &SceneGraph, node: Entity, flag: impl FnOnce(&PanelConfig) -> bool) -> bool {
    read(graph, node, |core| flag(&core.config)).unwrap_or(false)
}

fn prepare_panel_transition_in(graph: &mut SceneGraph, node: Entity) -> BoxedTransition {
    let Some(view) = ensure_view(graph, node) else {
        return Box::new(InstantAction::done());
    };
    let on_frame = read(graph, node, |core| core.on_in_frame.clone()).flatten();
    panel::prepare_transition(graph, view, PanelDirection::In, on_frame)
}

fn prepare_panel_transition_out(graph: &mut SceneGraph, node: Entity) -> BoxedTransition {
    let Some(view) = view(graph, node).filter(|_| graph.contains(node)) else {
        return Box::new(InstantAction::done());
    };

    let (on_frame, subpanels) = read(graph, node, |core| {
        (core.on_out_frame.clone(), core.subpanels.clone())
    })
    .unwrap_or_default();

    let own = panel::prepare_transition(graph, view, PanelDirection::Out, on_frame);
    if subpanels.is_empty() {
        return own;
    }

    let mut all = Join::new();
    all.push(own);
    for sub in subpanels {
        all.push(prepare_transition_out(graph, sub, false));
    }
    Box::new(all)
}
