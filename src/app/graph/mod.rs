use eframe::egui::Pos2;

use super::node::Node;

mod build;
mod interaction;
mod view;

pub(in crate::app) use interaction::{Interaction, PointerEvent, collect_pointer_events};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeRef {
    Hub,
    Leaf(usize),
}

pub(in crate::app) struct TopologyGraph {
    pub(in crate::app) hub: Node,
    pub(in crate::app) leaves: Vec<Node>,
}

impl TopologyGraph {
    pub(in crate::app) fn new(hub: Node) -> Self {
        Self {
            hub,
            leaves: Vec::new(),
        }
    }

    pub(in crate::app) fn edge_count(&self) -> usize {
        self.leaves.len()
    }

    pub(in crate::app) fn node(&self, node_ref: NodeRef) -> Option<&Node> {
        match node_ref {
            NodeRef::Hub => Some(&self.hub),
            NodeRef::Leaf(index) => self.leaves.get(index),
        }
    }

    pub(in crate::app) fn node_mut(&mut self, node_ref: NodeRef) -> Option<&mut Node> {
        match node_ref {
            NodeRef::Hub => Some(&mut self.hub),
            NodeRef::Leaf(index) => self.leaves.get_mut(index),
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn leaf(&self, key: &str) -> Option<&Node> {
        self.leaves.iter().find(|leaf| leaf.key == key)
    }

    /// Hub first, then leaves in insertion order; the first hit wins.
    pub(in crate::app) fn hit_test(&self, point: Pos2) -> Option<NodeRef> {
        if self.hub.contains_point(point) {
            return Some(NodeRef::Hub);
        }

        self.leaves
            .iter()
            .position(|leaf| leaf.contains_point(point))
            .map(NodeRef::Leaf)
    }
}
