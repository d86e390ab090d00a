//! Headless demo: a menu panel with two sub-panels, driven at 60 Hz.
//!
//! Run with `RUST_LOG=panelkit=debug cargo run` to see every state change.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use panelkit::{
    BindContext, Easing, Entity, NoModel, Panel, PanelConfig, PanelController, PanelError,
    Presenter, SceneGraph, TweenPanel, Vec2, panel,
};

const DT: f32 = 1.0 / 60.0;

struct Menu {
    items: Vec<Entity>,
    title: String,
}

impl Presenter for Menu {
    type Model = String;

    fn bind(&mut self, model: Option<&String>, cx: &mut BindContext<'_>) {
        self.title = model.cloned().unwrap_or_default();
        cx.add_subpanels(&self.items);
    }

    fn go(&mut self, _model: Option<&String>, graph: &mut SceneGraph, node: Entity) {
        tracing::info!(
            frame = graph.frame(),
            path = %graph.path(node),
            title = %self.title,
            "menu go"
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter))
        .init();
}

fn run_for(graph: &mut SceneGraph, seconds: f32, menu: PanelController<Menu>) {
    let frames = (seconds / DT).ceil() as usize;
    for _ in 0..frames {
        graph.tick(DT);
    }
    let visibility = menu
        .view(graph)
        .and_then(|view| panel::visibility(graph, view))
        .unwrap_or_default();
    tracing::info!(
        frame = graph.frame(),
        state = %menu.state(graph),
        visibility,
        "after {seconds}s"
    );
}

fn main() -> Result<(), PanelError> {
    init_tracing();

    let mut graph = SceneGraph::new();
    let hud = graph.spawn("hud");
    let menu_node = graph.spawn_child(hud, "menu")?;
    graph.insert(
        menu_node,
        Panel::Tween(
            TweenPanel::new()
                .duration(0.3)
                .easing_in(Easing::EaseInOut)
                .slide(Vec2::new(0.0, -80.0)),
        ),
    )?;

    let mut items = Vec::new();
    for (i, duration) in [0.2, 0.45].into_iter().enumerate() {
        let node = graph.spawn_child(menu_node, format!("item-{i}"))?;
        graph.insert(node, Panel::Tween(TweenPanel::new().duration(duration)))?;
        let item = PanelController::attach(&mut graph, node, NoModel, PanelConfig::default())?;
        item.transition_in_immediate(&mut graph);
        items.push(node);
    }

    let menu = PanelController::attach(
        &mut graph,
        menu_node,
        Menu {
            items,
            title: String::new(),
        },
        PanelConfig::default().debug_transitions(true),
    )?;

    menu.go_and_transition_in_with(&mut graph, "Main Menu".to_string());
    run_for(&mut graph, 0.15, menu);
    run_for(&mut graph, 0.2, menu);

    menu.change_model(&mut graph, Some("Settings".to_string()), true);
    run_for(&mut graph, 0.1, menu);

    // The exit waits for the slower item.
    menu.transition_out(&mut graph, true);
    run_for(&mut graph, 0.3, menu);
    run_for(&mut graph, 0.2, menu);

    Ok(())
}
