use eframe::egui::{Pos2, Rect, Ui, Vec2};

use super::{NodeRef, TopologyGraph};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    Leave,
}

#[derive(Debug, Default)]
pub(in crate::app) struct Interaction {
    held: Option<NodeRef>,
}

impl Interaction {
    pub(in crate::app) fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    pub(in crate::app) fn held(&self) -> Option<NodeRef> {
        self.held
    }

    pub(in crate::app) fn handle(&mut self, graph: &mut TopologyGraph, event: PointerEvent) {
        match event {
            PointerEvent::Down(point) => {
                if self.held.is_some() {
                    return;
                }

                if let Some(hit) = graph.hit_test(point) {
                    if let Some(node) = graph.node_mut(hit) {
                        node.velocity = Vec2::ZERO;
                    }
                    self.held = Some(hit);
                }
            }
            PointerEvent::Move(point) => {
                let Some(held) = self.held else {
                    return;
                };

                if let Some(node) = graph.node_mut(held) {
                    node.position = point;
                    node.velocity = Vec2::ZERO;
                }
            }
            PointerEvent::Up | PointerEvent::Leave => self.release(graph),
        }
    }

    pub(in crate::app) fn release(&mut self, graph: &mut TopologyGraph) {
        let Some(held) = self.held.take() else {
            return;
        };

        if let Some(node) = graph.node_mut(held) {
            node.velocity = Vec2::ZERO;
        }
    }

    pub(in crate::app) fn forget_leaves(&mut self) {
        if matches!(self.held, Some(NodeRef::Leaf(_))) {
            self.held = None;
        }
    }
}

pub(in crate::app) fn collect_pointer_events(ui: &Ui, rect: Rect) -> Vec<PointerEvent> {
    let origin = rect.min.to_vec2();

    ui.input(|input| {
        let mut events = Vec::with_capacity(3);
        let Some(pointer) = input.pointer.latest_pos().filter(|pos| rect.contains(*pos)) else {
            events.push(PointerEvent::Leave);
            return events;
        };

        let local = pointer - origin;
        if input.pointer.primary_pressed() {
            events.push(PointerEvent::Down(local));
        }
        events.push(PointerEvent::Move(local));
        if input.pointer.primary_released() {
            events.push(PointerEvent::Up);
        }
        events
    })
}
