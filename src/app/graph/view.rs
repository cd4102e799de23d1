use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, vec2};

use super::super::TopologyView;
use super::super::node::{Node, NodeKind};
use super::super::render_utils::{blend_color, canvas_to_screen, draw_background, draw_edge};
use super::NodeRef;

const LABEL_COLOR: Color32 = Color32::from_gray(235);
const DETAIL_COLOR: Color32 = Color32::from_gray(170);
const EMPHASIS_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

fn draw_node(painter: &Painter, rect: Rect, node: &Node, emphasized: bool) {
    let center = canvas_to_screen(rect, node.position);
    let fill = if emphasized {
        blend_color(node.color, Color32::WHITE, 0.18)
    } else {
        node.color
    };

    painter.circle_filled(center, node.radius, fill);
    let border = if emphasized {
        Stroke::new(3.0, EMPHASIS_COLOR)
    } else {
        Stroke::new(1.5, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
    };
    painter.circle_stroke(center, node.radius, border);

    let glyph = match node.kind {
        NodeKind::Hub => "🌐",
        NodeKind::Leaf => "🖥",
    };
    painter.text(
        center,
        Align2::CENTER_CENTER,
        glyph,
        FontId::proportional(node.radius * 0.9),
        Color32::WHITE,
    );

    draw_labels(painter, center + vec2(0.0, node.radius + 6.0), node);
}

fn label_lines(node: &Node) -> Vec<(String, Color32)> {
    let mut lines = vec![(node.name.clone(), LABEL_COLOR)];
    if node.kind == NodeKind::Hub {
        return lines;
    }

    let telemetry = &node.telemetry;
    if telemetry.online {
        lines.push(("● Online".to_string(), node.color));
        lines.push((
            format!("{}/{} players", telemetry.player_count, telemetry.max_players),
            DETAIL_COLOR,
        ));
        if telemetry.latency_ms > 0 {
            lines.push((format!("{} ms", telemetry.latency_ms), DETAIL_COLOR));
        }
    } else {
        lines.push(("○ Offline".to_string(), node.color));
    }

    if telemetry.restricted {
        lines.push(("🔒 Restricted".to_string(), Color32::from_rgb(240, 180, 90)));
    }

    lines
}

fn draw_labels(painter: &Painter, top: Pos2, node: &Node) {
    let mut cursor = top;
    for (index, (text, color)) in label_lines(node).into_iter().enumerate() {
        let size = if index == 0 { 13.0 } else { 11.0 };
        let drawn = painter.text(cursor, Align2::CENTER_TOP, text, FontId::proportional(size), color);
        cursor.y = drawn.bottom() + 1.0;
    }
}

impl TopologyView {
    pub(in crate::app) fn draw(&self, painter: &Painter, rect: Rect) {
        draw_background(painter, rect);

        let Some(graph) = &self.graph else {
            return;
        };

        let hub_center = canvas_to_screen(rect, graph.hub.position);
        for leaf in &graph.leaves {
            draw_edge(painter, hub_center, canvas_to_screen(rect, leaf.position), leaf);
        }

        let hovered = self.pointer.and_then(|point| graph.hit_test(point));
        let emphasized = |node_ref: NodeRef| {
            hovered == Some(node_ref) || self.interaction.held() == Some(node_ref)
        };

        draw_node(painter, rect, &graph.hub, emphasized(NodeRef::Hub));
        for (index, leaf) in graph.leaves.iter().enumerate() {
            draw_node(painter, rect, leaf, emphasized(NodeRef::Leaf(index)));
        }

        let hovered_node = self
            .interaction
            .held()
            .or(hovered)
            .and_then(|node_ref| graph.node(node_ref));
        self.draw_overlay(painter, rect, graph, hovered_node);
    }
}
