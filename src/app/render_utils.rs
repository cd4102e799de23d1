use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};

use super::node::Node;

const GRID_STEP: f32 = 40.0;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left();
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += GRID_STEP;
    }

    let mut y = rect.top();
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += GRID_STEP;
    }
}

pub(super) fn edge_is_dashed(leaf: &Node) -> bool {
    !leaf.telemetry.online
}

pub(super) fn draw_edge(painter: &Painter, start: Pos2, end: Pos2, leaf: &Node) {
    if edge_is_dashed(leaf) {
        let stroke = Stroke::new(1.6, Color32::from_rgba_unmultiplied(222, 78, 72, 150));
        painter.extend(Shape::dashed_line(&[start, end], stroke, 8.0, 6.0));
    } else {
        let stroke = Stroke::new(2.0, Color32::from_rgba_unmultiplied(120, 200, 160, 170));
        painter.line_segment([start, end], stroke);
    }
}

pub(super) fn canvas_to_screen(rect: Rect, canvas: Pos2) -> Pos2 {
    rect.min + canvas.to_vec2()
}
