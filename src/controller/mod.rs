//! Panel controllers.
//!
//! A [`PanelController`] binds a [`Presenter`] to a model and drives the
//! node's [`Panel`](crate::Panel) through its entrance and exit. It keeps a
//! [`PanelState`] that stays consistent no matter how show, hide and rebind
//! requests interleave:
//!
//! | From | Operation | To |
//! |------|-----------|----|
//! | `Out` | `transition_in` | `TransitioningIn` → `In` |
//! | `In` | `transition_out` | `TransitioningOut` → `Out` |
//! | `In` / `TransitioningIn` | `change_model` | unchanged (rebind only) |
//! | any | `dismiss_immediate` | `Out` |
//! | any | `transition_in_immediate` / `transition_out_immediate` | `In` / `Out` |
//!
//! Every operation that animates runs as the controller's single *active
//! transition*. Requesting another one first completes the previous one
//! early, so side effects are never lost and never interleave.
//!
//! The controller lives as components on its node; [`PanelController`] itself
//! is a cheap `Copy` handle and every method takes the graph.
//!
//! # Example
//!
//! ```
//! use panelkit::{NoModel, PanelConfig, PanelController, PanelState, SceneGraph};
//!
//! let mut graph = SceneGraph::new();
//! let node = graph.spawn("inventory");
//! let panel = PanelController::attach(&mut graph, node, NoModel, PanelConfig::default())?;
//!
//! panel.transition_in(&mut graph);
//! assert_eq!(panel.state(&graph), PanelState::TransitioningIn);
//!
//! for _ in 0..30 {
//!     graph.tick(1.0 / 60.0);
//! }
//! assert_eq!(panel.state(&graph), PanelState::In);
//!
//! panel.transition_out_immediate(&mut graph);
//! assert_eq!(panel.state(&graph), PanelState::Out);
//! # Ok::<(), panelkit::PanelError>(())
//! ```

mod active;
mod config;
mod lifecycle;
mod presenter;
mod state;

pub use config::PanelConfig;
pub use presenter::{BindContext, NoModel, Presenter};
pub use state::PanelState;

pub(crate) use active::tick_active_transitions;

use std::fmt;
use std::marker::PhantomData;

use hecs::Entity;

use self::active::ActiveSlot;
use self::lifecycle::PanelCore;
use self::presenter::{Binding, Hooks};
use crate::error::PanelError;
use crate::graph::SceneGraph;
use crate::transition::{BoxedTransition, Chain, Guarded, OnTransitionFrame};

/// Handle to the panel controller on one node.
pub struct PanelController<P: Presenter> {
    node: Entity,
    _presenter: PhantomData<fn() -> P>,
}

impl<P: Presenter> Clone for PanelController<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Presenter> Copy for PanelController<P> {}

impl<P: Presenter> PartialEq for PanelController<P> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<P: Presenter> Eq for PanelController<P> {}

impl<P: Presenter> fmt::Debug for PanelController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelController")
            .field("node", &self.node)
            .field("presenter", &std::any::type_name::<P>())
            .finish()
    }
}

impl<P: Presenter> PanelController<P> {
    fn wrap(node: Entity) -> Self {
        Self {
            node,
            _presenter: PhantomData,
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Attach a controller to `node` and resolve its view.
    ///
    /// The controller starts `Out` and unbound. If no panel can be found for
    /// the node, a default [`TweenPanel`](crate::TweenPanel) is attached.
    pub fn attach(
        graph: &mut SceneGraph,
        node: Entity,
        presenter: P,
        config: PanelConfig,
    ) -> Result<Self, PanelError> {
        if !graph.contains(node) {
            return Err(PanelError::NoSuchNode(node));
        }
        if graph.has::<PanelCore>(node) {
            return Err(PanelError::AlreadyAttached(node));
        }

        graph
            .world_mut()
            .insert(
                node,
                (
                    PanelCore::new(config, Hooks::of::<P>()),
                    ActiveSlot::default(),
                    Binding::new(presenter),
                ),
            )
            .map_err(|_| PanelError::NoSuchNode(node))?;
        lifecycle::ensure_view(graph, node);

        tracing::debug!(
            path = %graph.path(node),
            presenter = std::any::type_name::<P>(),
            "attached panel controller"
        );
        Ok(Self::wrap(node))
    }

    /// The controller on `node`, if it has one with presenter type `P`.
    pub fn from_node(graph: &SceneGraph, node: Entity) -> Option<Self> {
        graph
            .has::<Binding<P>>(node)
            .then(|| Self::wrap(node))
    }

    /// The node this controller lives on.
    pub fn node(&self) -> Entity {
        self.node
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Animate in, binding first if needed.
    pub fn transition_in(&self, graph: &mut SceneGraph) {
        let enter = lifecycle::prepare_transition_in(graph, self.node, false);
        active::run_as_active(graph, self.node, enter, false);
    }

    /// Run the whole entrance synchronously.
    pub fn transition_in_immediate(&self, graph: &mut SceneGraph) {
        let enter = lifecycle::prepare_transition_in(graph, self.node, false);
        active::run_as_active(graph, self.node, enter, true);
    }

    /// Animate out, optionally unbinding afterwards.
    ///
    /// Does nothing while unbound or when already out or on the way out.
    pub fn transition_out(&self, graph: &mut SceneGraph, unbind: bool) {
        if !self.is_bound(graph) || self.is_out_or_transitioning_out(graph) {
            return;
        }
        let exit = lifecycle::prepare_transition_out(graph, self.node, unbind);
        active::run_as_active(graph, self.node, exit, false);
    }

    /// Run the whole exit synchronously, without unbinding.
    pub fn transition_out_immediate(&self, graph: &mut SceneGraph) {
        let exit = lifecycle::prepare_transition_out(graph, self.node, false);
        active::run_as_active(graph, self.node, exit, true);
    }

    /// Bind `model` (unbinding any previous one) and animate in.
    pub fn go_and_transition_in_with(&self, graph: &mut SceneGraph, model: P::Model) {
        let enter = self.prepare_go_and_transition_in_with(graph, model);
        active::run_as_active(graph, self.node, enter, false);
    }

    /// Swap the bound model.
    ///
    /// `None` transitions out and unbinds. An unbound controller goes through
    /// [`go_and_transition_in_with`](Self::go_and_transition_in_with).
    /// Otherwise the presenter is rebound in place; a panel that is still in
    /// stays put, a panel that was fully in before the swap snaps back in, and
    /// anything else animates in.
    pub fn change_model(&self, graph: &mut SceneGraph, model: Option<P::Model>, recall_go: bool) {
        let Some(model) = model else {
            self.transition_out(graph, true);
            return;
        };
        if !self.is_bound(graph) {
            self.go_and_transition_in_with(graph, model);
            return;
        }

        let state_before = self.state(graph);

        lifecycle::unbind(graph, self.node);
        lifecycle::reset(graph, self.node);
        presenter::set_model::<P>(graph, self.node, Some(model));
        lifecycle::bind(graph, self.node);
        if recall_go {
            lifecycle::go(graph, self.node);
        }

        if self.is_in_or_transitioning_in(graph) {
            return;
        }
        if state_before == PanelState::In {
            self.transition_in_immediate(graph);
        } else {
            self.transition_in(graph);
        }
    }

    /// Snap the panel out right now, bypassing animation.
    ///
    /// The active transition, if any, keeps running.
    pub fn dismiss_immediate(&self, graph: &mut SceneGraph) {
        lifecycle::dismiss_immediate(graph, self.node);
    }

    /// Complete the active transition (and any it starts) synchronously.
    pub fn force_complete_active_transitions(&self, graph: &mut SceneGraph) {
        active::force_complete(graph, self.node);
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// The entrance sequence, not yet started.
    pub fn prepare_transition_in(&self, graph: &SceneGraph) -> BoxedTransition {
        lifecycle::prepare_transition_in(graph, self.node, false)
    }

    /// The exit sequence (joined with every sub-panel's exit), not yet started.
    pub fn prepare_transition_out(&self, graph: &SceneGraph, unbind: bool) -> BoxedTransition {
        lifecycle::prepare_transition_out(graph, self.node, unbind)
    }

    /// Unbind, store `model`, then the entrance with a forced bind and go.
    pub fn prepare_go_and_transition_in_with(
        &self,
        graph: &SceneGraph,
        model: P::Model,
    ) -> BoxedTransition {
        let node = self.node;
        let steps = Chain::new()
            .action(move |g| {
                if lifecycle::is_bound(g, node) {
                    lifecycle::unbind(g, node);
                }
                presenter::set_model::<P>(g, node, Some(model));
            })
            .then(lifecycle::prepare_transition_in(graph, node, true));
        Box::new(Guarded::new(node, steps))
    }

    /// The entrance, but only if there is a view that is not already in.
    pub fn ensure_transition_in(&self, graph: &SceneGraph) -> BoxedTransition {
        lifecycle::ensure_transition_in(graph, self.node)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current state; `Out` once the node is destroyed.
    pub fn state(&self, graph: &SceneGraph) -> PanelState {
        lifecycle::state(graph, self.node)
    }

    /// Has a view and is `In` or `TransitioningIn`.
    pub fn is_in_or_transitioning_in(&self, graph: &SceneGraph) -> bool {
        lifecycle::is_in_or_transitioning_in(graph, self.node)
    }

    /// Has a view and is `Out` or `TransitioningOut`.
    pub fn is_out_or_transitioning_out(&self, graph: &SceneGraph) -> bool {
        lifecycle::is_out_or_transitioning_out(graph, self.node)
    }

    pub fn is_bound(&self, graph: &SceneGraph) -> bool {
        lifecycle::is_bound(graph, self.node)
    }

    pub fn has_view(&self, graph: &SceneGraph) -> bool {
        lifecycle::has_view(graph, self.node)
    }

    /// The entity whose panel animates this node.
    pub fn view(&self, graph: &SceneGraph) -> Option<Entity> {
        lifecycle::view(graph, self.node)
    }

    pub fn has_active_transition(&self, graph: &SceneGraph) -> bool {
        graph
            .world()
            .get::<&ActiveSlot>(self.node)
            .map(|slot| slot.is_occupied())
            .unwrap_or(false)
    }

    /// Registered sub-panel nodes, in registration order.
    pub fn subpanels(&self, graph: &SceneGraph) -> Vec<Entity> {
        lifecycle::read(graph, self.node, |core| core.subpanels.clone()).unwrap_or_default()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn config(&self, graph: &SceneGraph) -> Option<PanelConfig> {
        lifecycle::config(graph, self.node)
    }

    pub fn set_config(&self, graph: &mut SceneGraph, config: PanelConfig) {
        lifecycle::write(graph, self.node, |core| core.config = config);
    }

    /// Callback for every frame of the entrance animation.
    pub fn set_transition_in_frame(
        &self,
        graph: &mut SceneGraph,
        callback: Option<OnTransitionFrame>,
    ) {
        lifecycle::write(graph, self.node, |core| core.on_in_frame = callback);
    }

    /// Callback for every frame of the exit animation.
    pub fn set_transition_out_frame(
        &self,
        graph: &mut SceneGraph,
        callback: Option<OnTransitionFrame>,
    ) {
        lifecycle::write(graph, self.node, |core| core.on_out_frame = callback);
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Run the presenter's bind hook. No-op when already bound.
    pub fn bind(&self, graph: &mut SceneGraph) {
        lifecycle::bind(graph, self.node);
    }

    /// Clear sub-panels and run the presenter's unbind hook.
    ///
    /// With `ensure_transition_out_on_unbind`, a panel that is not out is
    /// first transitioned out immediately and its view released.
    pub fn unbind(&self, graph: &mut SceneGraph) {
        lifecycle::unbind(graph, self.node);
    }

    /// Drop the cached view, run the reset hook and resolve the view again.
    pub fn reset(&self, graph: &mut SceneGraph) {
        lifecycle::reset(graph, self.node);
    }

    /// Run the presenter's go hook.
    pub fn go(&self, graph: &mut SceneGraph) {
        lifecycle::go(graph, self.node);
    }

    /// Register child controllers whose exits join this panel's exit.
    ///
    /// Ignored while unbound; nodes without a controller are skipped.
    pub fn add_subpanels(&self, graph: &mut SceneGraph, subpanels: &[Entity]) {
        lifecycle::add_subpanels(graph, self.node, subpanels);
    }

    /// Borrow the presenter and the current model.
    ///
    /// Returns `None` if the node is gone or a presenter hook is running.
    pub fn with_presenter<R>(
        &self,
        graph: &mut SceneGraph,
        f: impl FnOnce(&mut P, Option<&P::Model>) -> R,
    ) -> Option<R> {
        graph
            .world_mut()
            .query_one_mut::<&mut Binding<P>>(self.node)
            .ok()
            .map(|binding| f(&mut binding.presenter, binding.model.as_ref()))
    }
}
