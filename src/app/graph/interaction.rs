use eframe::egui::{self, Rect};

use super::super::render_utils::screen_to_scene;
use super::{GraphEvent, GraphScene};

/// What the pointer is resting on. Nodes win over edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum HoverTarget {
    Node(usize),
    Edge(usize),
}

pub(super) fn hovered_target(
    scene: &GraphScene,
    rect: Rect,
    response: &egui::Response,
    edge_hover: bool,
) -> Option<HoverTarget> {
    let pointer = screen_to_scene(rect, response.hover_pos()?);
    if let Some(index) = scene.node_at(pointer) {
        return Some(HoverTarget::Node(index));
    }
    if edge_hover {
        return scene.edge_at(pointer).map(HoverTarget::Edge);
    }
    None
}

/// Press pins the node under the pointer, movement drags the pin and
/// release lets it go.
pub(super) fn handle_node_drag(scene: &mut GraphScene, rect: Rect, response: &egui::Response) {
    if response.drag_started_by(egui::PointerButton::Primary)
        && let Some(pointer) = response.interact_pointer_pos()
        && let Some(index) = scene.node_at(screen_to_scene(rect, pointer))
    {
        scene.begin_drag(index);
    }

    if scene.dragged().is_some()
        && response.dragged_by(egui::PointerButton::Primary)
        && let Some(pointer) = response.interact_pointer_pos()
    {
        scene.drag_to(screen_to_scene(rect, pointer));
    }

    if response.drag_stopped() {
        scene.end_drag();
    }
}

pub(super) fn click_event(
    scene: &GraphScene,
    rect: Rect,
    response: &egui::Response,
) -> Option<GraphEvent> {
    if !response.clicked_by(egui::PointerButton::Primary) {
        return None;
    }

    let hit = response
        .interact_pointer_pos()
        .and_then(|pointer| scene.node_at(screen_to_scene(rect, pointer)));

    Some(match hit {
        Some(index) => GraphEvent::NodeActivated(scene.graph().nodes[index].id.clone()),
        None => GraphEvent::FilterReset,
    })
}
