use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::proxy::TopologySource;

mod frame;
mod graph;
mod node;
mod physics;
mod render_utils;
mod sync;
mod topology;
mod ui;

use frame::EguiFrameClock;
use graph::{Interaction, TopologyGraph};
use node::Bounds;
use sync::Poller;

#[derive(Clone, Debug)]
pub struct LaunchSettings {
    pub proxy_id: String,
    pub proxy_name: String,
    pub base_url: String,
    pub poll_interval: Duration,
}

pub struct TopologyApp {
    settings: LaunchSettings,
    source: Arc<dyn TopologySource>,
    view: Option<TopologyView>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PhysicsConfig {
    ideal_distance: f32,
    spring_constant: f32,
    repulsion_constant: f32,
    repulsion_radius: f32,
    damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ideal_distance: 180.0,
            spring_constant: 0.01,
            repulsion_constant: 4000.0,
            repulsion_radius: 150.0,
            damping: 0.85,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ViewConfig {
    poll_interval: Duration,
    layout_radius: f32,
    physics: PhysicsConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            layout_radius: 180.0,
            physics: PhysicsConfig::default(),
        }
    }
}

#[derive(Default)]
struct SyncStatus {
    last_success: Option<Instant>,
    last_error: Option<String>,
    completed_polls: u64,
}

#[derive(Default)]
struct PhysicsScratch {
    forces: Vec<Vec2>,
}

struct TopologyView {
    proxy_id: String,
    proxy_name: String,
    graph: Option<TopologyGraph>,
    bounds: Bounds,
    interaction: Interaction,
    pointer: Option<Pos2>,
    config: ViewConfig,
    live_physics: bool,
    needs_layout: bool,
    poller: Option<Poller>,
    sync_status: SyncStatus,
    scratch: PhysicsScratch,
}

impl TopologyApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: LaunchSettings,
        source: Arc<dyn TopologySource>,
    ) -> Self {
        Self {
            settings,
            source,
            view: None,
        }
    }

    fn view_config(&self) -> ViewConfig {
        ViewConfig {
            poll_interval: self.settings.poll_interval,
            ..ViewConfig::default()
        }
    }

    fn ensure_view(&mut self, bounds: Bounds) -> Option<&mut TopologyView> {
        if self.view.is_none() {
            self.view = TopologyView::initialize(
                &self.settings.proxy_id,
                &self.settings.proxy_name,
                bounds,
                Arc::clone(&self.source),
                self.view_config(),
            );
        }

        self.view.as_mut()
    }
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::right("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let bounds = Bounds::new(rect.width(), rect.height());
                let Some(view) = self.ensure_view(bounds) else {
                    return;
                };

                view.set_bounds(bounds);
                view.drain_poller();
                for event in graph::collect_pointer_events(ui, rect) {
                    view.handle_pointer(event);
                }
                view.advance(&EguiFrameClock::new(ctx));
                view.update_cursor(ui);
                view.draw(&ui.painter_at(rect), rect);
            });
    }
}
