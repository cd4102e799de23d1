use eframe::egui::{Color32, Pos2, Vec2};

use crate::proxy::StatusSnapshot;

pub(in crate::app) const HUB_RADIUS: f32 = 38.0;
pub(in crate::app) const LEAF_RADIUS: f32 = 28.0;
pub(in crate::app) const BOUNDS_MARGIN: f32 = 10.0;
pub(in crate::app) const LABEL_OFFSET: f32 = 40.0;

pub(in crate::app) const HUB_COLOR: Color32 = Color32::from_rgb(88, 101, 242);
pub(in crate::app) const ONLINE_COLOR: Color32 = Color32::from_rgb(67, 181, 129);
pub(in crate::app) const OFFLINE_COLOR: Color32 = Color32::from_rgb(222, 78, 72);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeKind {
    Hub,
    Leaf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct Telemetry {
    pub(in crate::app) online: bool,
    pub(in crate::app) player_count: u32,
    pub(in crate::app) max_players: u32,
    pub(in crate::app) ticks_per_second: f32,
    pub(in crate::app) latency_ms: u32,
    pub(in crate::app) restricted: bool,
}

impl Telemetry {
    fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        Self {
            online: snapshot.online.unwrap_or(false),
            player_count: snapshot.player_count.unwrap_or(0),
            max_players: snapshot.max_players.unwrap_or(0),
            ticks_per_second: snapshot.tps.unwrap_or(0.0),
            latency_ms: snapshot.latency_ms.unwrap_or(0),
            restricted: snapshot.restricted.unwrap_or(false),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Bounds {
    pub(in crate::app) width: f32,
    pub(in crate::app) height: f32,
}

impl Bounds {
    pub(in crate::app) fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub(in crate::app) fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub(in crate::app) fn center(self) -> Pos2 {
        Pos2::new(self.width * 0.5, self.height * 0.5)
    }

    pub(in crate::app) fn x_range(self, radius: f32) -> (f32, f32) {
        (radius + BOUNDS_MARGIN, self.width - radius - BOUNDS_MARGIN)
    }

    /// Allowed `(min, max)` along y, keeping room for the labels.
    pub(in crate::app) fn y_range(self, radius: f32) -> (f32, f32) {
        let reserved = radius + BOUNDS_MARGIN + LABEL_OFFSET;
        (reserved, self.height - reserved)
    }
}

fn clamp_axis(value: f32, (min, max): (f32, f32)) -> (f32, bool) {
    if min > max {
        let middle = (min + max) * 0.5;
        return (middle, value != middle);
    }

    let clamped = value.clamp(min, max);
    (clamped, clamped != value)
}

#[derive(Clone, Debug)]
pub(in crate::app) struct Node {
    pub(in crate::app) key: String,
    pub(in crate::app) name: String,
    pub(in crate::app) address: Option<String>,
    pub(in crate::app) kind: NodeKind,
    pub(in crate::app) position: Pos2,
    pub(in crate::app) velocity: Vec2,
    pub(in crate::app) radius: f32,
    pub(in crate::app) telemetry: Telemetry,
    pub(in crate::app) color: Color32,
}

impl Node {
    pub(in crate::app) fn hub(key: impl Into<String>, name: impl Into<String>, position: Pos2) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            address: None,
            kind: NodeKind::Hub,
            position,
            velocity: Vec2::ZERO,
            radius: HUB_RADIUS,
            telemetry: Telemetry::default(),
            color: HUB_COLOR,
        }
    }

    pub(in crate::app) fn leaf(name: impl Into<String>, position: Pos2) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            address: None,
            kind: NodeKind::Leaf,
            position,
            velocity: Vec2::ZERO,
            radius: LEAF_RADIUS,
            telemetry: Telemetry::default(),
            color: OFFLINE_COLOR,
        }
    }

    pub(in crate::app) fn is_hub(&self) -> bool {
        self.kind == NodeKind::Hub
    }

    pub(in crate::app) fn update_telemetry(&mut self, snapshot: &StatusSnapshot) {
        if self.is_hub() {
            return;
        }

        self.telemetry = Telemetry::from_snapshot(snapshot);
        self.color = if self.telemetry.online {
            ONLINE_COLOR
        } else {
            OFFLINE_COLOR
        };
    }

    pub(in crate::app) fn contains_point(&self, point: Pos2) -> bool {
        self.position.distance(point) <= self.radius
    }

    pub(in crate::app) fn apply_force(&mut self, force: Vec2) {
        self.velocity += force;
    }

    pub(in crate::app) fn integrate(&mut self, bounds: Bounds, damping: f32) {
        self.position += self.velocity;
        self.velocity *= damping;

        let (x, x_clamped) = clamp_axis(self.position.x, bounds.x_range(self.radius));
        let (y, y_clamped) = clamp_axis(self.position.y, bounds.y_range(self.radius));
        self.position = Pos2::new(x, y);
        if x_clamped {
            self.velocity.x = 0.0;
        }
        if y_clamped {
            self.velocity.y = 0.0;
        }
    }
}
