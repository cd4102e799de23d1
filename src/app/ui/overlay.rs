use std::time::Instant;

use eframe::egui::{Align2, Color32, FontId, Painter, Rect, vec2};

use super::super::graph::TopologyGraph;
use super::super::node::{Node, NodeKind};
use super::super::{SyncStatus, TopologyView};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct OverlayStats {
    pub(in crate::app) online: usize,
    pub(in crate::app) total: usize,
    pub(in crate::app) total_players: u64,
}

impl OverlayStats {
    pub(in crate::app) fn collect(graph: &TopologyGraph) -> Self {
        graph.leaves.iter().fold(Self::default(), |mut stats, leaf| {
            stats.total += 1;
            if leaf.telemetry.online {
                stats.online += 1;
            }
            stats.total_players += u64::from(leaf.telemetry.player_count);
            stats
        })
    }

    pub(in crate::app) fn online_text(&self) -> String {
        format!("{}/{} online", self.online, self.total)
    }

    pub(in crate::app) fn players_text(&self) -> String {
        match self.total_players {
            1 => "1 player".to_string(),
            players => format!("{players} players"),
        }
    }
}

impl SyncStatus {
    pub(in crate::app) fn describe(&self, now: Instant) -> String {
        match (&self.last_error, self.last_success) {
            (Some(error), _) => format!("refresh failed: {error}"),
            (None, Some(at)) => {
                format!("updated {}s ago", now.saturating_duration_since(at).as_secs())
            }
            (None, None) => "waiting for first refresh...".to_string(),
        }
    }
}

pub(in crate::app) fn node_details(node: &Node, graph: &TopologyGraph) -> String {
    let summary = match node.kind {
        NodeKind::Hub => format!("{}  |  proxy  |  {} backends", node.name, graph.leaves.len()),
        NodeKind::Leaf => {
            let telemetry = &node.telemetry;
            if telemetry.online {
                format!(
                    "{}  |  {:.1} TPS  |  {}/{} players  |  {} ms",
                    node.name,
                    telemetry.ticks_per_second,
                    telemetry.player_count,
                    telemetry.max_players,
                    telemetry.latency_ms
                )
            } else {
                format!("{}  |  offline", node.name)
            }
        }
    };

    match &node.address {
        Some(address) => format!("{summary}  |  {address}"),
        None => summary,
    }
}

impl TopologyView {
    pub(in crate::app) fn draw_overlay(
        &self,
        painter: &Painter,
        rect: Rect,
        graph: &TopologyGraph,
        hovered: Option<&Node>,
    ) {
        let stats = OverlayStats::collect(graph);
        let lines = [
            (format!("{} network", self.proxy_name), 16.0, Color32::from_gray(245)),
            (stats.online_text(), 13.0, Color32::from_gray(220)),
            (stats.players_text(), 13.0, Color32::from_gray(220)),
            (
                self.sync_status.describe(Instant::now()),
                11.0,
                if self.sync_status.last_error.is_some() {
                    Color32::from_rgb(240, 150, 120)
                } else {
                    Color32::from_gray(150)
                },
            ),
        ];

        let mut cursor = rect.left_top() + vec2(12.0, 10.0);
        for (text, size, color) in lines {
            let drawn = painter.text(cursor, Align2::LEFT_TOP, text, FontId::proportional(size), color);
            cursor.y = drawn.bottom() + 4.0;
        }

        if let Some(node) = hovered {
            painter.text(
                rect.left_bottom() + vec2(12.0, -10.0),
                Align2::LEFT_BOTTOM,
                node_details(node, graph),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
