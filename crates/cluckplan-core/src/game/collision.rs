//! Player/collectible overlap test.

use glam::Vec2;

/// Centre distance below which a collectible counts as caught.
pub fn collect_radius(player_radius: f32, collectible_radius: f32, tolerance: f32) -> f32 {
    player_radius + collectible_radius + tolerance
}

pub fn within_reach(player: Vec2, collectible: Vec2, reach: f32) -> bool {
    player.distance(collectible) < reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_miss_and_hit() {
        let reach = collect_radius(20.0, 12.5, 5.0);
        assert_eq!(reach, 37.5);
        let player = Vec2::new(200.0, 300.0);
        assert!(within_reach(player, Vec2::new(205.0, 302.0), reach));
        assert!(!within_reach(player, Vec2::new(200.0, 337.5), reach));
        assert!(within_reach(player, Vec2::new(200.0, 337.4), reach));
    }
}
