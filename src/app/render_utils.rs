use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

const GRID_STEP: f32 = 56.0;

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + GRID_STEP;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += GRID_STEP;
    }

    let mut y = rect.top() + GRID_STEP;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += GRID_STEP;
    }
}

/// Scene coordinates are relative to the canvas' top-left corner.
pub(super) fn scene_to_screen(rect: Rect, scene: Vec2) -> Pos2 {
    rect.min + scene
}

pub(super) fn screen_to_scene(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}

pub(super) fn circle_points(center: Pos2, radius: f32, segments: usize) -> Vec<Pos2> {
    (0..=segments)
        .map(|step| {
            let angle = step as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::angled(angle) * radius
        })
        .collect()
}
