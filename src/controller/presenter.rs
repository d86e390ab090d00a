//! Presenter hooks and the model slot.
//!
//! A [`Presenter`] is the application half of a panel: it receives the bound
//! model and wires up whatever the panel displays. The controller decides
//! *when* hooks run; presenters only decide *what* they do.

use hecs::Entity;

use crate::graph::SceneGraph;

/// Application logic bound to a panel.
///
/// All hooks have empty defaults. While a hook runs the presenter is detached
/// from its node, so hooks must not call back into their own controller's
/// model or presenter accessors.
///
/// # Example
///
/// ```
/// use panelkit::{BindContext, Presenter};
///
/// struct Scoreboard {
///     lines: Vec<String>,
/// }
///
/// impl Presenter for Scoreboard {
///     type Model = Vec<(String, u32)>;
///
///     fn bind(&mut self, model: Option<&Self::Model>, _cx: &mut BindContext<'_>) {
///         self.lines = model
///             .into_iter()
///             .flatten()
///             .map(|(name, score)| format!("{name}: {score}"))
///             .collect();
///     }
///
///     fn unbind(&mut self, _graph: &mut panelkit::SceneGraph, _node: panelkit::Entity) {
///         self.lines.clear();
///     }
/// }
/// ```
pub trait Presenter: Send + Sync + 'static {
    type Model: Send + Sync + 'static;

    /// Called once per bind, with the current model.
    fn bind(&mut self, model: Option<&Self::Model>, cx: &mut BindContext<'_>) {
        let _ = (model, cx);
    }

    /// Called once per unbind, after sub-panels have been cleared.
    fn unbind(&mut self, graph: &mut SceneGraph, node: Entity) {
        let _ = (graph, node);
    }

    /// Called when the controller drops its cached view.
    fn reset(&mut self, graph: &mut SceneGraph, node: Entity) {
        let _ = (graph, node);
    }

    /// Called after binding to start whatever the panel runs while visible.
    fn go(&mut self, model: Option<&Self::Model>, graph: &mut SceneGraph, node: Entity) {
        let _ = (model, graph, node);
    }
}

/// Presenter for panels that carry no model and no logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoModel;

impl Presenter for NoModel {
    type Model = ();
}

/// Passed to [`Presenter::bind`].
pub struct BindContext<'a> {
    graph: &'a mut SceneGraph,
    node: Entity,
    subpanels: Vec<Entity>,
}

impl BindContext<'_> {
    /// The node being bound.
    pub fn node(&self) -> Entity {
        self.node
    }

    pub fn graph(&mut self) -> &mut SceneGraph {
        &mut *self.graph
    }

    /// Register a child controller whose exit joins this panel's exit.
    pub fn add_subpanel(&mut self, subpanel: Entity) {
        self.subpanels.push(subpanel);
    }

    pub fn add_subpanels(&mut self, subpanels: &[Entity]) {
        self.subpanels.extend_from_slice(subpanels);
    }
}

/// Presenter plus model, stored on the node.
pub(crate) struct Binding<P: Presenter> {
    pub(crate) presenter: P,
    pub(crate) model: Option<P::Model>,
}

impl<P: Presenter> Binding<P> {
    pub(crate) fn new(presenter: P) -> Self {
        Self {
            presenter,
            model: None,
        }
    }
}

/// Type-erased entry points into a node's `Binding<P>`.
///
/// Lets transition steps and sub-panel propagation call presenter hooks
/// without knowing the presenter type.
#[derive(Clone, Copy)]
pub(crate) struct Hooks {
    pub(crate) bind: fn(&mut SceneGraph, Entity) -> Vec<Entity>,
    pub(crate) unbind: fn(&mut SceneGraph, Entity),
    pub(crate) reset: fn(&mut SceneGraph, Entity),
    pub(crate) go: fn(&mut SceneGraph, Entity),
}

impl Hooks {
    pub(crate) fn of<P: Presenter>() -> Self {
        Self {
            bind: bind_hook::<P>,
            unbind: unbind_hook::<P>,
            reset: reset_hook::<P>,
            go: go_hook::<P>,
        }
    }
}

/// Detach the binding, run `f`, and put the binding back if the node survived.
fn with_detached<P: Presenter, R>(
    graph: &mut SceneGraph,
    node: Entity,
    f: impl FnOnce(&mut Binding<P>, &mut SceneGraph) -> R,
) -> Option<R> {
    let mut binding = graph.world_mut().remove_one::<Binding<P>>(node).ok()?;
    let out = f(&mut binding, graph);
    if graph.contains(node) {
        let _ = graph.insert(node, binding);
    }
    Some(out)
}

fn bind_hook<P: Presenter>(graph: &mut SceneGraph, node: Entity) -> Vec<Entity> {
    with_detached::<P, _>(graph, node, |binding, graph| {
        let mut cx = BindContext {
            graph,
            node,
            subpanels: Vec::new(),
        };
        binding.presenter.bind(binding.model.as_ref(), &mut cx);
        cx.subpanels
    })
    .unwrap_or_default()
}

fn unbind_hook<P: Presenter>(graph: &mut SceneGraph, node: Entity) {
    with_detached::<P, _>(graph, node, |binding, graph| {
        binding.presenter.unbind(graph, node)
    });
}

fn reset_hook<P: Presenter>(graph: &mut SceneGraph, node: Entity) {
    with_detached::<P, _>(graph, node, |binding, graph| {
        binding.presenter.reset(graph, node)
    });
}

fn go_hook<P: Presenter>(graph: &mut SceneGraph, node: Entity) {
    with_detached::<P, _>(graph, node, |binding, graph| {
        binding.presenter.go(binding.model.as_ref(), graph, node)
    });
}

/// Replace the model in the node's model slot.
pub(crate) fn set_model<P: Presenter>(
    graph: &mut SceneGraph,
    node: Entity,
    model: Option<P::Model>,
) {
    if let Ok(binding) = graph.world_mut().query_one_mut::<&mut Binding<P>>(node) {
        binding.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        children: Vec<Entity>,
    }

    impl Presenter for Recorder {
        type Model = u32;

        fn bind(&mut self, model: Option<&u32>, cx: &mut BindContext<'_>) {
            self.calls.push(format!("bind {model:?}"));
            cx.add_subpanels(&self.children);
        }

        fn go(&mut self, model: Option<&u32>, _graph: &mut SceneGraph, _node: Entity) {
            self.calls.push(format!("go {model:?}"));
        }
    }

    #[test]
    fn hooks_reach_the_typed_presenter() {
        let mut graph = SceneGraph::new();
        let child = graph.spawn("child");
        let node = graph.spawn("node");
        let mut binding = Binding::new(Recorder {
            children: vec![child],
            ..Recorder::default()
        });
        binding.model = Some(7);
        graph.insert(node, binding).unwrap();

        let hooks = Hooks::of::<Recorder>();
        let subpanels = (hooks.bind)(&mut graph, node);
        set_model::<Recorder>(&mut graph, node, Some(9));
        (hooks.go)(&mut graph, node);

        assert_eq!(subpanels, vec![child]);
        let binding = graph.world().get::<&Binding<Recorder>>(node).unwrap();
        assert_eq!(binding.presenter.calls, vec!["bind Some(7)", "go Some(9)"]);
    }

    #[test]
    fn hooks_on_missing_binding_do_nothing() {
        let mut graph = SceneGraph::new();
        let node = graph.spawn("bare");
        let hooks = Hooks::of::<NoModel>();

        assert!((hooks.bind)(&mut graph, node).is_empty());
        (hooks.unbind)(&mut graph, node);
        (hooks.reset)(&mut graph, node);
        assert!(!graph.has::<Binding<NoModel>>(node));
    }
}
