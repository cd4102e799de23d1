use eframe::egui::{Align, Layout, Ui};

use super::super::TopologyApp;
use super::OverlayStats;

impl TopologyApp {
    pub(in crate::app) fn draw_top_bar(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("proxy-topology");
            ui.separator();
            ui.label(format!("proxy: {}", self.settings.proxy_name));
            ui.label(format!("id: {}", self.settings.proxy_id));
            ui.label(format!("api: {}", self.settings.base_url));

            let Some(graph) = self.view.as_ref().and_then(|view| view.graph.as_ref()) else {
                return;
            };
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let stats = OverlayStats::collect(graph);
                ui.label(format!("edges: {}", graph.edge_count()));
                ui.label(stats.online_text());
            });
        });
    }
}
