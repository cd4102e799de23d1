use eframe::egui::{Pos2, Vec2};

pub(super) fn spring_toward_hub(
    leaf: Pos2,
    hub: Pos2,
    ideal_distance: f32,
    spring_constant: f32,
) -> Vec2 {
    let delta = hub - leaf;
    let distance = delta.length();
    if distance <= 0.0 {
        return Vec2::ZERO;
    }

    let direction = delta / distance;
    direction * ((distance - ideal_distance) * spring_constant)
}

pub(super) fn repulsion_between(
    point_a: Pos2,
    point_b: Pos2,
    repulsion_constant: f32,
    repulsion_radius: f32,
) -> Option<Vec2> {
    let delta = point_a - point_b;
    let distance_sq = delta.length_sq();
    if distance_sq <= 0.0 || distance_sq >= repulsion_radius * repulsion_radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    Some(delta / distance * (repulsion_constant / distance_sq))
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn spring_pulls_far_leaves_in_and_pushes_near_leaves_out() {
        let hub = pos2(0.0, 0.0);
        let far = spring_toward_hub(pos2(300.0, 0.0), hub, 200.0, 0.01);
        assert!((far.x + 1.0).abs() < 1e-5);
        assert_eq!(far.y, 0.0);

        let near = spring_toward_hub(pos2(0.0, 100.0), hub, 200.0, 0.01);
        assert!((near.y - 1.0).abs() < 1e-5);

        assert_eq!(spring_toward_hub(hub, hub, 200.0, 0.01), Vec2::ZERO);
    }

    #[test]
    fn repulsion_is_inverse_square_within_radius() {
        let force = repulsion_between(pos2(20.0, 0.0), pos2(0.0, 0.0), 4000.0, 150.0)
            .expect("inside radius");
        assert!((force.x - 10.0).abs() < 1e-4);

        assert!(repulsion_between(pos2(200.0, 0.0), pos2(0.0, 0.0), 4000.0, 150.0).is_none());
        assert!(repulsion_between(pos2(5.0, 5.0), pos2(5.0, 5.0), 4000.0, 150.0).is_none());
    }
}
