use eframe::egui::{self, Ui};

use super::super::{PhysicsConfig, TopologyApp};

impl TopologyApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View Controls");
        ui.separator();
        ui.add_space(4.0);

        let Some(view) = self.view.as_mut() else {
            ui.label("Waiting for a drawing surface...");
            return;
        };

        ui.checkbox(&mut view.live_physics, "Live physics simulation")
            .on_hover_text("Continuously simulate layout forces. Dragging a node pauses it.");

        ui.horizontal(|ui| {
            if ui
                .button("Refresh now")
                .on_hover_text("Fetch topology and status without waiting for the next poll.")
                .clicked()
            {
                view.refresh_now();
            }
            if ui
                .button("Reset layout")
                .on_hover_text("Lay the backends out on a fresh ring after the next refresh.")
                .clicked()
            {
                view.request_layout_reset();
            }
        });

        ui.separator();

        ui.collapsing("Physics tuning", |ui| {
            let physics = &mut view.config.physics;
            ui.add(
                egui::Slider::new(&mut physics.ideal_distance, 60.0..=400.0)
                    .text("Ideal distance")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Distance every backend settles at from the proxy.");
            ui.add(
                egui::Slider::new(&mut physics.spring_constant, 0.001..=0.05)
                    .text("Spring")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly backends are pulled toward the ideal distance.");
            ui.add(
                egui::Slider::new(&mut physics.repulsion_constant, 0.0..=20_000.0)
                    .text("Repulsion")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly nearby backends push away from each other.");
            ui.add(
                egui::Slider::new(&mut physics.repulsion_radius, 20.0..=400.0)
                    .text("Repulsion radius")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Backends further apart than this do not repel.");
            ui.add(
                egui::Slider::new(&mut physics.damping, 0.5..=0.98)
                    .text("Velocity damping")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Fraction of velocity kept after each tick.");

            if ui.button("Restore defaults").clicked() {
                *physics = PhysicsConfig::default();
            }
        });

        ui.separator();
        ui.label(format!("Refresh interval: {:?}", view.config.poll_interval));
        ui.label(format!("Completed refreshes: {}", view.sync_status.completed_polls));
        if let Some(error) = &view.sync_status.last_error {
            ui.colored_label(egui::Color32::from_rgb(240, 150, 120), error.as_str());
        }
    }
}
