use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Rect, Sense, Shape, Stroke, Ui,
    epaint::QuadraticBezierShape,
};

use super::super::geometry::{PathShape, arrow_glyph};
use super::super::highlight::{Highlight, StyleTable};
use super::super::render_utils::{circle_points, draw_background, scene_to_screen, with_opacity};
use super::super::ui::{edge_tooltip, node_tooltip};
use super::super::ViewModel;
use super::interaction::{HoverTarget, click_event, handle_node_drag, hovered_target};
use super::{GraphEvent, GraphScene};

const DRAG_RING_GAP: f32 = 6.0;
const NO_RESULTS_TEXT: &str = "No assets match";

fn paint_edges(
    painter: &Painter,
    rect: Rect,
    scene: &GraphScene,
    highlight: &Highlight,
    styles: &StyleTable,
) {
    for (index, path) in scene.edge_paths().iter().enumerate() {
        if path.start == path.end {
            continue;
        }

        let style = styles.edge(highlight.edges[index]);
        let stroke = Stroke::new(style.width, with_opacity(style.stroke, style.opacity));
        let start = scene_to_screen(rect, path.start);
        let end = scene_to_screen(rect, path.end);

        match path.shape {
            PathShape::Straight => {
                painter.line_segment([start, end], stroke);
            }
            PathShape::Quadratic { control } => {
                painter.add(QuadraticBezierShape::from_points_stroke(
                    [start, scene_to_screen(rect, control), end],
                    false,
                    Color32::TRANSPARENT,
                    stroke,
                ));
            }
        }

        // reported once per pass by the scene
        let Some(glyph) = arrow_glyph(path.arrow) else {
            continue;
        };
        let [tip, left, notch, right] = glyph.points().map(|point| scene_to_screen(rect, point));
        let color = with_opacity(style.arrow, style.opacity);
        painter.add(Shape::convex_polygon(vec![tip, left, notch], color, Stroke::NONE));
        painter.add(Shape::convex_polygon(vec![tip, notch, right], color, Stroke::NONE));
    }
}

fn paint_nodes(
    painter: &Painter,
    rect: Rect,
    scene: &GraphScene,
    highlight: &Highlight,
    styles: &StyleTable,
    show_labels: bool,
) {
    for (index, node) in scene.graph().nodes.iter().enumerate() {
        let style = styles.node(highlight.nodes[index]);
        let center = scene_to_screen(rect, node.pos);

        painter.circle(
            center,
            node.radius,
            with_opacity(style.fill, style.opacity),
            Stroke::new(style.stroke_width, with_opacity(style.stroke, style.opacity)),
        );

        if show_labels {
            let font = if style.label_strong {
                FontId::proportional(13.5)
            } else {
                FontId::proportional(12.0)
            };
            painter.text(
                center,
                Align2::CENTER_CENTER,
                node.name.as_str(),
                font,
                with_opacity(style.label, style.opacity),
            );
        }

        if scene.dragged() == Some(index) {
            let ring = circle_points(center, node.radius + DRAG_RING_GAP, 48);
            painter.extend(Shape::dashed_line(
                &ring,
                Stroke::new(3.0, Color32::from_gray(235)),
                6.0,
                4.0,
            ));
        }
    }
}

impl ViewModel {
    /// Paints the current pass into the remaining space and reports clicks.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) -> Vec<GraphEvent> {
        let mut events = Vec::new();
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if rect.width() < 1.0 || rect.height() < 1.0 {
            return events;
        }
        self.ensure_scene(rect.size());

        let Some(scene) = self.scene.as_mut() else {
            return events;
        };

        handle_node_drag(scene, rect, &response);
        let moving = scene.step_frame();
        if moving || scene.dragged().is_some() {
            ui.ctx().request_repaint();
        }

        if scene.dragged().is_none()
            && let Some(event) = click_event(scene, rect, &response)
        {
            events.push(event);
        }

        let highlight = Highlight::compute(scene.graph(), &self.mode);
        paint_edges(&painter, rect, scene, &highlight, &self.styles);
        paint_nodes(
            &painter,
            rect,
            scene,
            &highlight,
            &self.styles,
            self.config.view.show_labels,
        );

        if self.mode.is_no_results() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                NO_RESULTS_TEXT,
                FontId::proportional(20.0),
                Color32::from_gray(210),
            );
        }

        let hovered = if scene.dragged().is_some() {
            None
        } else {
            hovered_target(scene, rect, &response, self.config.view.edge_tooltips)
        };

        if let Some(target) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let text = match target {
                HoverTarget::Node(index) => node_tooltip(scene.graph(), index),
                HoverTarget::Edge(index) => edge_tooltip(scene.graph(), index),
            };
            response.on_hover_text_at_pointer(text);
        }

        events
    }
}
