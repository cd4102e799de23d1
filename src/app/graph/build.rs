use std::collections::{HashMap, HashSet};
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Pos2, vec2};

use crate::proxy::{BackendDescriptor, StatusSnapshot};

use super::super::node::Node;
use super::TopologyGraph;

pub(in crate::app) fn leaf_slot(center: Pos2, index: usize, count: usize, radius: f32) -> Pos2 {
    let angle = index as f32 * (TAU / count.max(1) as f32) - FRAC_PI_2;
    center + vec2(angle.cos(), angle.sin()) * radius
}

fn statuses_by_name(statuses: &[StatusSnapshot]) -> HashMap<&str, &StatusSnapshot> {
    statuses
        .iter()
        .map(|status| (status.name.as_str(), status))
        .collect()
}

impl TopologyGraph {
    pub(in crate::app) fn recreate_leaves(
        &mut self,
        servers: &[BackendDescriptor],
        statuses: &[StatusSnapshot],
        layout_radius: f32,
    ) {
        let by_name = statuses_by_name(statuses);
        let center = self.hub.position;

        let mut seen = HashSet::with_capacity(servers.len());
        let unique = servers
            .iter()
            .filter(|server| {
                let first = seen.insert(server.name.as_str());
                if !first {
                    log::warn!("ignoring duplicate backend `{}` in layout", server.name);
                }
                first
            })
            .collect::<Vec<_>>();
        let count = unique.len();

        self.leaves = unique
            .into_iter()
            .enumerate()
            .map(|(index, server)| {
                let mut leaf =
                    Node::leaf(server.name.clone(), leaf_slot(center, index, count, layout_radius));
                leaf.address = server.address.clone();
                match by_name.get(server.name.as_str()) {
                    Some(status) => leaf.update_telemetry(status),
                    None => leaf.update_telemetry(&StatusSnapshot::empty(server.name.as_str())),
                }
                leaf
            })
            .collect();
    }

    /// Updates telemetry of existing leaves in place. Positions, velocities and
    /// the leaf set itself are left untouched.
    pub(in crate::app) fn refresh_telemetry(&mut self, statuses: &[StatusSnapshot]) {
        let by_name = statuses_by_name(statuses);
        for leaf in &mut self.leaves {
            match by_name.get(leaf.key.as_str()) {
                Some(status) => leaf.update_telemetry(status),
                None => leaf.update_telemetry(&StatusSnapshot::empty(leaf.key.as_str())),
            }
        }
    }
}
