//! Player vs obstacle collision detection
//!
//! Both sides are tested with the same inset hitbox (`Vehicle::bounds`), so a
//! sprite-edge graze never counts as a crash.

use super::entity::{ObstacleCar, PlayerCar, Vehicle};
use crate::config::GameConfig;

/// Index of the first obstacle the player overlaps, if any
pub fn first_collision(
    player: &PlayerCar,
    obstacles: &[ObstacleCar],
    config: &GameConfig,
) -> Option<usize> {
    let player_box = player.bounds(config);
    obstacles
        .iter()
        .position(|o| player_box.intersects(&o.bounds(config)))
}

/// True if the player overlaps any active obstacle
pub fn any_collision(player: &PlayerCar, obstacles: &[ObstacleCar], config: &GameConfig) -> bool {
    first_collision(player, obstacles, config).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarColor;

    fn obstacle_at(config: &GameConfig, lane: usize, y: i32) -> ObstacleCar {
        let mut obstacle = ObstacleCar::spawn(config, lane, CarColor::Green);
        obstacle.pos.y = y;
        obstacle
    }

    #[test]
    fn test_same_lane_overlap_collides() {
        let config = GameConfig::default();
        let player = PlayerCar::new(&config, CarColor::Red);
        let obstacle = obstacle_at(&config, player.lane, player.pos.y - 50);
        assert!(any_collision(&player, &[obstacle], &config));
    }

    #[test]
    fn test_other_lane_never_collides() {
        let config = GameConfig::default();
        let player = PlayerCar::new(&config, CarColor::Red);
        let obstacles = [
            obstacle_at(&config, 0, player.pos.y),
            obstacle_at(&config, 2, player.pos.y),
        ];
        assert!(!any_collision(&player, &obstacles, &config));
    }

    #[test]
    fn test_hitbox_margin_forgives_sprite_contact() {
        let config = GameConfig::default();
        let player = PlayerCar::new(&config, CarColor::Red);
        let margin = config.hitbox_margin;

        // Sprites overlap by less than both margins combined
        let graze = obstacle_at(
            &config,
            player.lane,
            player.pos.y - config.car_height + 2 * margin,
        );
        assert!(!any_collision(&player, &[graze], &config));

        let hit = obstacle_at(
            &config,
            player.lane,
            player.pos.y - config.car_height + 2 * margin + 1,
        );
        assert!(any_collision(&player, &[hit], &config));
    }

    #[test]
    fn test_first_collision_reports_index() {
        let config = GameConfig::default();
        let player = PlayerCar::new(&config, CarColor::Red);
        let obstacles = [
            obstacle_at(&config, player.lane, -100),
            obstacle_at(&config, player.lane, player.pos.y),
        ];
        assert_eq!(first_collision(&player, &obstacles, &config), Some(1));
        assert_eq!(first_collision(&player, &[], &config), None);
    }

    #[test]
    fn test_y_band_scan() {
        let config = GameConfig::default();
        let player = PlayerCar::new(&config, CarColor::Red);
        let margin = config.hitbox_margin;
        let inner_height = config.car_height - 2 * margin;

        for y in -config.car_height..=config.field_height {
            let obstacle = obstacle_at(&config, player.lane, y);
            let expected = (y - player.pos.y).abs() < inner_height;
            assert_eq!(any_collision(&player, &[obstacle], &config), expected, "y = {y}");
        }
    }
}
