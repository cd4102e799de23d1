use std::sync::Arc;
use std::time::Instant;

use eframe::egui::{CursorIcon, Ui};

use crate::proxy::TopologySource;

use super::frame::FrameClock;
use super::graph::{Interaction, PointerEvent, TopologyGraph};
use super::node::{Bounds, Node};
use super::physics::step_physics;
use super::sync::{PollOutcome, Poller};
use super::{PhysicsScratch, SyncStatus, TopologyView, ViewConfig};

impl TopologyView {
    pub(in crate::app) fn initialize(
        proxy_id: &str,
        proxy_name: &str,
        bounds: Bounds,
        source: Arc<dyn TopologySource>,
        config: ViewConfig,
    ) -> Option<Self> {
        let mut view = Self::detached(proxy_id, proxy_name, bounds, config)?;
        match Poller::spawn(source, proxy_id.to_string(), config.poll_interval) {
            Ok(poller) => view.poller = Some(poller),
            Err(error) => {
                log::error!("{error:#}");
                view.sync_status.last_error = Some(error.to_string());
            }
        }

        log::info!(
            "topology view for proxy {proxy_id} ({proxy_name}) started, refreshing every {:?}",
            config.poll_interval
        );
        Some(view)
    }

    pub(in crate::app) fn detached(
        proxy_id: &str,
        proxy_name: &str,
        bounds: Bounds,
        config: ViewConfig,
    ) -> Option<Self> {
        if !bounds.is_usable() {
            log::debug!("no drawing surface for proxy {proxy_id}; view not created");
            return None;
        }

        Some(Self {
            proxy_id: proxy_id.to_string(),
            proxy_name: proxy_name.to_string(),
            graph: Some(TopologyGraph::new(Node::hub(
                proxy_id,
                proxy_name,
                bounds.center(),
            ))),
            bounds,
            interaction: Interaction::default(),
            pointer: None,
            config,
            live_physics: true,
            needs_layout: true,
            poller: None,
            sync_status: SyncStatus::default(),
            scratch: PhysicsScratch::default(),
        })
    }

    pub(in crate::app) fn cleanup(&mut self) {
        self.poller = None;
        self.interaction = Interaction::default();
        self.pointer = None;
        if self.graph.take().is_some() {
            log::info!("topology view for proxy {} torn down", self.proxy_id);
        }
    }

    pub(in crate::app) fn set_bounds(&mut self, bounds: Bounds) {
        if bounds.is_usable() {
            self.bounds = bounds;
        }
    }

    pub(in crate::app) fn request_layout_reset(&mut self) {
        self.needs_layout = true;
        if let Some(poller) = &self.poller {
            poller.refresh_now();
        }
    }

    pub(in crate::app) fn refresh_now(&self) {
        if let Some(poller) = &self.poller {
            poller.refresh_now();
        }
    }

    pub(in crate::app) fn drain_poller(&mut self) {
        let Some(poller) = &self.poller else {
            return;
        };

        for result in poller.drain() {
            match result {
                Ok(outcome) => self.apply_poll(&outcome),
                Err(error) => self.sync_status.last_error = Some(error),
            }
        }
    }

    pub(in crate::app) fn apply_poll(&mut self, outcome: &PollOutcome) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };

        if self.needs_layout {
            self.interaction.forget_leaves();
            graph.recreate_leaves(&outcome.servers, &outcome.statuses, self.config.layout_radius);
            self.needs_layout = false;
            log::debug!(
                "laid out {} backends around proxy {}",
                graph.leaves.len(),
                self.proxy_id
            );
        } else {
            graph.refresh_telemetry(&outcome.statuses);
            log::debug!(
                "refreshed telemetry of {} backends for proxy {}",
                graph.leaves.len(),
                self.proxy_id
            );
        }

        self.sync_status.last_success = Some(Instant::now());
        self.sync_status.last_error = None;
        self.sync_status.completed_polls += 1;
    }

    pub(in crate::app) fn handle_pointer(&mut self, event: PointerEvent) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };

        match event {
            PointerEvent::Down(point) | PointerEvent::Move(point) => self.pointer = Some(point),
            PointerEvent::Leave => self.pointer = None,
            PointerEvent::Up => {}
        }
        self.interaction.handle(graph, event);
    }

    pub(in crate::app) fn advance(&mut self, clock: &dyn FrameClock) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };

        if self.live_physics && !self.interaction.is_holding() {
            step_physics(
                graph,
                &mut self.scratch,
                self.bounds,
                self.config.physics,
                self.interaction.held(),
            );
        }

        clock.request_frame();
    }

    pub(in crate::app) fn update_cursor(&self, ui: &Ui) {
        let Some(graph) = &self.graph else {
            return;
        };

        let icon = if self.interaction.is_holding() {
            Some(CursorIcon::Grabbing)
        } else if self.pointer.and_then(|point| graph.hit_test(point)).is_some() {
            Some(CursorIcon::Grab)
        } else {
            None
        };

        if let Some(icon) = icon {
            ui.output_mut(|output| output.cursor_icon = icon);
        }
    }
}

impl Drop for TopologyView {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use eframe::egui::{pos2, vec2};

    use crate::proxy::{BackendDescriptor, StatusSnapshot};

    use super::super::frame::ManualFrameClock;
    use super::super::graph::NodeRef;
    use super::super::node::{OFFLINE_COLOR, ONLINE_COLOR};
    use super::super::render_utils::edge_is_dashed;
    use super::super::sync::tests::FakeSource;
    use super::super::ui::OverlayStats;
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(1200.0, 900.0)
    }

    fn view() -> TopologyView {
        TopologyView::detached("p1", "Lobby", bounds(), ViewConfig::default())
            .expect("surface is usable")
    }

    fn outcome(names: &[&str], statuses: Vec<StatusSnapshot>) -> PollOutcome {
        PollOutcome {
            servers: names
                .iter()
                .map(|name| BackendDescriptor {
                    name: (*name).to_string(),
                    address: None,
                })
                .collect(),
            statuses,
        }
    }

    fn status(name: &str, online: bool, players: u32) -> StatusSnapshot {
        StatusSnapshot {
            online: Some(online),
            player_count: Some(players),
            max_players: Some(100),
            latency_ms: Some(20),
            ..StatusSnapshot::empty(name)
        }
    }

    fn graph(view: &TopologyView) -> &TopologyGraph {
        view.graph.as_ref().expect("view is active")
    }

    #[test]
    fn missing_surface_creates_nothing() {
        for bounds in [Bounds::new(0.0, 600.0), Bounds::new(800.0, -1.0), Bounds::new(f32::NAN, 1.0)] {
            assert!(TopologyView::detached("p1", "Lobby", bounds, ViewConfig::default()).is_none());
        }
    }

    #[test]
    fn three_backends_start_on_a_ring_from_the_top() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby", "survival", "creative"], Vec::new()));

        let graph = graph(&view);
        assert_eq!(graph.leaves.len(), 3);
        assert_eq!(graph.edge_count(), 3);

        let hub = graph.hub.position;
        for (leaf, degrees) in graph.leaves.iter().zip([-90.0_f32, 30.0, 150.0]) {
            let offset = leaf.position - hub;
            assert!((offset.length() - view.config.layout_radius).abs() < 1e-3);
            let angle = offset.y.atan2(offset.x).to_degrees();
            assert!((angle - degrees).abs() < 1e-2, "{angle} vs {degrees}");
        }
    }

    #[test]
    fn later_polls_only_touch_telemetry() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby", "survival"], vec![status("survival", true, 3)]));
        let clock = ManualFrameClock::default();
        for _ in 0..10 {
            view.advance(&clock);
        }
        let before = graph(&view)
            .leaves
            .iter()
            .map(|leaf| (leaf.position, leaf.velocity))
            .collect::<Vec<_>>();

        view.apply_poll(&outcome(&["creative"], vec![status("survival", true, 40)]));

        let graph = graph(&view);
        assert_eq!(graph.leaves.len(), 2);
        assert!(graph.leaf("creative").is_none());
        let after = graph
            .leaves
            .iter()
            .map(|leaf| (leaf.position, leaf.velocity))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        assert_eq!(graph.leaf("survival").map(|leaf| leaf.telemetry.player_count), Some(40));
    }

    #[test]
    fn offline_report_recolors_and_dashes_the_edge() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby", "survival"], vec![
            status("lobby", true, 1),
            status("survival", true, 5),
        ]));
        let survival = graph(&view).leaf("survival").expect("leaf exists");
        assert_eq!(survival.color, ONLINE_COLOR);
        assert!(!edge_is_dashed(survival));

        view.apply_poll(&outcome(&["lobby", "survival"], vec![
            status("lobby", true, 1),
            status("survival", false, 0),
        ]));
        let survival = graph(&view).leaf("survival").expect("leaf exists");
        assert_eq!(survival.color, OFFLINE_COLOR);
        assert!(edge_is_dashed(survival));
    }

    #[test]
    fn empty_topology_has_empty_overlay() {
        let mut view = view();
        view.apply_poll(&outcome(&[], Vec::new()));

        let graph = graph(&view);
        assert_eq!(graph.leaves.len(), 0);
        assert_eq!(graph.edge_count(), 0);
        let stats = OverlayStats::collect(graph);
        assert_eq!(stats.online_text(), "0/0 online");
        assert_eq!(stats.total_players, 0);
    }

    #[test]
    fn dragging_the_hub_freezes_leaves_until_release() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby", "survival", "creative"], Vec::new()));
        let clock = ManualFrameClock::default();
        for _ in 0..30 {
            view.advance(&clock);
        }

        let start = graph(&view).hub.position;
        let frozen = graph(&view)
            .leaves
            .iter()
            .map(|leaf| leaf.position)
            .collect::<Vec<_>>();

        view.handle_pointer(PointerEvent::Down(start));
        assert_eq!(view.interaction.held(), Some(NodeRef::Hub));
        for step in 1..=10 {
            let pointer = start + vec2(step as f32 * 10.0, 0.0);
            view.handle_pointer(PointerEvent::Move(pointer));
            view.advance(&clock);
            assert_eq!(graph(&view).hub.position, pointer);
            let leaves = graph(&view)
                .leaves
                .iter()
                .map(|leaf| leaf.position)
                .collect::<Vec<_>>();
            assert_eq!(leaves, frozen);
        }

        view.handle_pointer(PointerEvent::Up);
        let hub = graph(&view).hub.clone();
        assert_eq!(hub.position, start + vec2(100.0, 0.0));
        assert_eq!(hub.velocity, vec2(0.0, 0.0));

        let mean_x = |view: &TopologyView| {
            let leaves = &graph(view).leaves;
            leaves.iter().map(|leaf| leaf.position.x).sum::<f32>() / leaves.len() as f32
        };
        let released_mean = mean_x(&view);
        for _ in 0..60 {
            view.advance(&clock);
        }
        assert!(mean_x(&view) > released_mean + 20.0);
        assert_eq!(graph(&view).hub.position, hub.position);
    }

    #[test]
    fn pointer_down_while_holding_keeps_first_node() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby"], Vec::new()));
        let leaf = graph(&view).leaves[0].position;
        let hub = graph(&view).hub.position;

        view.handle_pointer(PointerEvent::Down(leaf));
        view.handle_pointer(PointerEvent::Down(hub));
        assert_eq!(view.interaction.held(), Some(NodeRef::Leaf(0)));

        view.handle_pointer(PointerEvent::Leave);
        assert!(!view.interaction.is_holding());
        assert!(view.pointer.is_none());
    }

    #[test]
    fn layout_reset_recreates_ring_and_drops_leaf_hold() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby", "survival"], Vec::new()));
        let leaf = graph(&view).leaves[1].position;
        view.handle_pointer(PointerEvent::Down(leaf));
        view.handle_pointer(PointerEvent::Move(pos2(100.0, 100.0)));

        view.request_layout_reset();
        view.apply_poll(&outcome(&["lobby", "survival", "creative"], Vec::new()));

        assert_eq!(graph(&view).leaves.len(), 3);
        assert!(!view.interaction.is_holding());
    }

    #[test]
    fn advance_requests_a_frame_until_cleanup() {
        let mut view = view();
        let clock = ManualFrameClock::default();
        view.advance(&clock);
        view.advance(&clock);
        assert_eq!(clock.requested(), 2);

        view.cleanup();
        assert!(view.graph.is_none());
        view.advance(&clock);
        view.apply_poll(&outcome(&["lobby"], Vec::new()));
        view.handle_pointer(PointerEvent::Down(pos2(600.0, 450.0)));
        assert_eq!(clock.requested(), 2);
        assert!(view.graph.is_none());
    }

    #[test]
    fn paused_simulation_still_schedules_frames() {
        let mut view = view();
        view.apply_poll(&outcome(&["lobby"], Vec::new()));
        view.graph.as_mut().expect("active").leaves[0].velocity = vec2(5.0, 0.0);
        view.live_physics = false;

        let clock = ManualFrameClock::default();
        let before = graph(&view).leaves[0].position;
        view.advance(&clock);
        assert_eq!(graph(&view).leaves[0].position, before);
        assert_eq!(clock.requested(), 1);
    }

    #[test]
    fn repeated_backend_names_share_one_leaf() {
        let mut view = view();
        view.apply_poll(&outcome(&["a", "a", "b"], vec![status("a", true, 3)]));

        let graph = graph(&view);
        let keys = graph.leaves.iter().map(|leaf| leaf.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.leaves[0].telemetry.player_count, 3);

        let hub = graph.hub.position;
        let below = graph.leaves[1].position;
        assert!((below.x - hub.x).abs() < 1e-3);
        assert!((below.y - (hub.y + view.config.layout_radius)).abs() < 1e-3);
    }

    fn drain_until(view: &mut TopologyView, done: impl Fn(&TopologyView) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(view) {
            assert!(Instant::now() < deadline, "poller produced nothing in time");
            thread::sleep(Duration::from_millis(5));
            view.drain_poller();
        }
    }

    #[test]
    fn polled_outcomes_lay_out_then_refresh_then_keep_telemetry_on_failure() {
        let source = Arc::new(FakeSource::with_servers(&["lobby", "survival"]));
        source
            .statuses
            .lock()
            .unwrap()
            .push(status("survival", true, 12));

        let config = ViewConfig {
            poll_interval: Duration::from_secs(3600),
            ..ViewConfig::default()
        };
        let mut view = TopologyView::initialize("p1", "Lobby", bounds(), source.clone(), config)
            .expect("surface is usable");

        drain_until(&mut view, |view| view.sync_status.completed_polls == 1);
        assert!(!view.needs_layout);
        assert_eq!(graph(&view).leaves.len(), 2);
        assert_eq!(graph(&view).leaves[1].telemetry.player_count, 12);
        assert!(view.sync_status.last_success.is_some());

        view.graph.as_mut().expect("active").leaves[1].position = pos2(700.0, 500.0);
        *source.servers.lock().unwrap() = Vec::new();
        *source.statuses.lock().unwrap() = vec![status("survival", true, 30)];
        view.refresh_now();
        drain_until(&mut view, |view| view.sync_status.completed_polls == 2);

        let leaves = &graph(&view).leaves;
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[1].position, pos2(700.0, 500.0));
        assert_eq!(leaves[1].telemetry.player_count, 30);
        assert!(!leaves[0].telemetry.online);

        *source.fail.lock().unwrap() = true;
        view.refresh_now();
        drain_until(&mut view, |view| view.sync_status.last_error.is_some());

        let leaf = &graph(&view).leaves[1];
        assert!(leaf.telemetry.online);
        assert_eq!(leaf.telemetry.player_count, 30);
        assert_eq!(view.sync_status.completed_polls, 2);
        let error = view.sync_status.last_error.as_deref().unwrap_or_default();
        assert!(error.contains("connection refused"));

        view.cleanup();
        assert!(view.poller.is_none());
        view.drain_poller();
        assert_eq!(view.sync_status.completed_polls, 2);
    }
}
