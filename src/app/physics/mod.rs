mod forces;

use eframe::egui::Vec2;

use super::graph::{NodeRef, TopologyGraph};
use super::node::Bounds;
use super::{PhysicsConfig, PhysicsScratch};
use forces::{repulsion_between, spring_toward_hub};

pub(super) fn step_physics(
    graph: &mut TopologyGraph,
    scratch: &mut PhysicsScratch,
    bounds: Bounds,
    config: PhysicsConfig,
    held: Option<NodeRef>,
) {
    let leaf_count = graph.leaves.len();
    let forces = &mut scratch.forces;
    forces.clear();
    forces.resize(leaf_count, Vec2::ZERO);

    let hub_position = graph.hub.position;
    for (force, leaf) in forces.iter_mut().zip(&graph.leaves) {
        *force += spring_toward_hub(
            leaf.position,
            hub_position,
            config.ideal_distance,
            config.spring_constant,
        );
    }

    for i in 0..leaf_count {
        for j in (i + 1)..leaf_count {
            let Some(push) = repulsion_between(
                graph.leaves[i].position,
                graph.leaves[j].position,
                config.repulsion_constant,
                config.repulsion_radius,
            ) else {
                continue;
            };

            forces[i] += push;
            forces[j] -= push;
        }
    }

    for (index, (leaf, force)) in graph.leaves.iter_mut().zip(forces.iter()).enumerate() {
        if held == Some(NodeRef::Leaf(index)) {
            continue;
        }
        leaf.apply_force(*force);
        leaf.integrate(bounds, config.damping);
    }

    if held != Some(NodeRef::Hub) {
        graph.hub.integrate(bounds, config.damping);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Pos2, pos2, vec2};

    use super::super::node::Node;
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(1200.0, 900.0)
    }

    fn star(leaves: &[Pos2]) -> TopologyGraph {
        let mut graph = TopologyGraph::new(Node::hub("p", "Lobby", pos2(600.0, 450.0)));
        for (index, position) in leaves.iter().enumerate() {
            graph.leaves.push(Node::leaf(format!("s{index}"), *position));
        }
        graph
    }

    fn in_bounds(node: &Node, bounds: Bounds) -> bool {
        let (min_x, max_x) = bounds.x_range(node.radius);
        let (min_y, max_y) = bounds.y_range(node.radius);
        (min_x..=max_x).contains(&node.position.x) && (min_y..=max_y).contains(&node.position.y)
    }

    #[test]
    fn single_leaf_settles_at_ideal_distance() {
        let config = PhysicsConfig::default();
        let mut graph = star(&[pos2(1000.0, 450.0)]);
        let mut scratch = PhysicsScratch::default();
        let initial_error = (400.0 - config.ideal_distance).abs();

        let mut window_peaks = Vec::new();
        for _ in 0..4 {
            let mut peak = 0.0_f32;
            for _ in 0..20 {
                step_physics(&mut graph, &mut scratch, bounds(), config, None);
                let distance = graph.leaves[0].position.distance(graph.hub.position);
                peak = peak.max((distance - config.ideal_distance).abs());
            }
            window_peaks.push(peak);
        }

        assert!(window_peaks[0] < initial_error);
        for pair in window_peaks.windows(2) {
            assert!(pair[1] < pair[0]);
        }

        for _ in 0..400 {
            step_physics(&mut graph, &mut scratch, bounds(), config, None);
        }
        let distance = graph.leaves[0].position.distance(graph.hub.position);
        assert!((distance - config.ideal_distance).abs() < 0.5);
    }

    #[test]
    fn hub_without_velocity_stays_put() {
        let mut graph = star(&[pos2(600.0, 200.0), pos2(800.0, 450.0)]);
        let mut scratch = PhysicsScratch::default();
        for _ in 0..50 {
            step_physics(&mut graph, &mut scratch, bounds(), PhysicsConfig::default(), None);
        }
        assert_eq!(graph.hub.position, pos2(600.0, 450.0));
    }

    #[test]
    fn repulsion_is_symmetric() {
        let config = PhysicsConfig {
            spring_constant: 0.0,
            damping: 0.5,
            ..PhysicsConfig::default()
        };
        let mut graph = star(&[pos2(580.0, 200.0), pos2(620.0, 200.0)]);
        let mut scratch = PhysicsScratch::default();
        step_physics(&mut graph, &mut scratch, bounds(), config, None);

        let left = graph.leaves[0].velocity;
        let right = graph.leaves[1].velocity;
        assert!(left.x < 0.0);
        assert!((left + right).length() < 1e-5);
    }

    #[test]
    fn distant_leaves_do_not_repel() {
        let config = PhysicsConfig {
            spring_constant: 0.0,
            ..PhysicsConfig::default()
        };
        let mut graph = star(&[pos2(200.0, 200.0), pos2(1000.0, 700.0)]);
        let mut scratch = PhysicsScratch::default();
        step_physics(&mut graph, &mut scratch, bounds(), config, None);

        assert_eq!(graph.leaves[0].velocity, Vec2::ZERO);
        assert_eq!(graph.leaves[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn held_leaf_is_not_integrated() {
        let mut graph = star(&[pos2(1000.0, 450.0)]);
        let mut scratch = PhysicsScratch::default();
        step_physics(
            &mut graph,
            &mut scratch,
            bounds(),
            PhysicsConfig::default(),
            Some(NodeRef::Leaf(0)),
        );
        assert_eq!(graph.leaves[0].position, pos2(1000.0, 450.0));
    }

    #[test]
    fn crowded_ring_stays_inside_bounds() {
        let bounds = Bounds::new(500.0, 400.0);
        let config = PhysicsConfig {
            repulsion_constant: 60_000.0,
            ..PhysicsConfig::default()
        };
        let leaves = (0..12)
            .map(|index| pos2(240.0 + index as f32, 200.0 + (index % 3) as f32))
            .collect::<Vec<_>>();
        let mut graph = star(&leaves);
        graph.hub.position = pos2(250.0, 200.0);
        graph.hub.velocity = vec2(40.0, -25.0);
        let mut scratch = PhysicsScratch::default();

        for _ in 0..300 {
            step_physics(&mut graph, &mut scratch, bounds, config, None);
            assert!(in_bounds(&graph.hub, bounds));
            for leaf in &graph.leaves {
                assert!(in_bounds(leaf, bounds));
            }
        }
    }
}
