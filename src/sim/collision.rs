//! Swept AABB collision against the tile grid
//!
//! The player box is shrunk to a point and every tile box grown by the player's
//! size (Minkowski sum), so each test is a ray against four axis-aligned walls.
//! Solid contacts stop the motion at the nearest wall and slide the remainder
//! along it; trigger tiles only report that they were crossed.

use glam::{IVec2, Vec2};

use super::player::Player;
use super::tilemap::{TileFlags, TileMap};
use crate::consts::{
    COLLISION_T_EPSILON, MAX_COLLISION_ITERATIONS, SPIKES_SIDE_INSET, SPIKES_TOP_INSET,
};
use crate::project_out;

/// What the player touched during one resolution call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionResult {
    /// OR of every tile type contacted this call
    pub touched: TileFlags,
    /// Coin consumed this call
    pub coin_index: Option<usize>,
    /// Landed on top of a ground tile
    pub on_ground: bool,
    /// Resolution passes used (at most `MAX_COLLISION_ITERATIONS`)
    pub passes: usize,
}

/// Tile box grown by the player's extents, relative to the tile centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl HitBox {
    /// Minkowski box of a tile and the player
    pub fn expanded(tile_size: f32, width: f32, height: f32) -> Self {
        let half = Vec2::new(tile_size + width, tile_size + height) * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    /// Smaller box for spikes: lower top, narrower sides
    pub fn spikes(tile_size: f32, width: f32, height: f32) -> Self {
        let mut hit_box = Self::expanded(tile_size, width, height);
        let side = SPIKES_SIDE_INSET * tile_size;
        hit_box.min.x += side;
        hit_box.max.x -= side;
        hit_box.max.y -= SPIKES_TOP_INSET * tile_size;
        hit_box
    }
}

/// Intersect the motion `rel + t * delta` with the wall `x = wall`.
///
/// Axis names are generic: call with x/y swapped to test horizontal walls.
/// Accepts `0 <= t < t_lowest` when the crossing lies within
/// `[wall_min, wall_max]` on the other axis, then stores `t` pulled back by
/// `COLLISION_T_EPSILON`. Parallel motion (`delta_x == 0`) never hits.
#[allow(clippy::too_many_arguments)]
pub fn test_wall(
    t_lowest: &mut f32,
    wall: f32,
    wall_min: f32,
    wall_max: f32,
    rel_x: f32,
    rel_y: f32,
    delta_x: f32,
    delta_y: f32,
) -> bool {
    if delta_x == 0.0 {
        return false;
    }

    let t = (wall - rel_x) / delta_x;
    if t >= 0.0 && t < *t_lowest {
        let y = rel_y + t * delta_y;
        if y >= wall_min && y <= wall_max {
            *t_lowest = (t - COLLISION_T_EPSILON).max(0.0);
            return true;
        }
    }
    false
}

/// Sweep against a solid box, only testing walls the motion approaches.
///
/// Returns the outward normal of the nearest wall hit, if it beat `t_lowest`.
fn sweep_solid(hit_box: &HitBox, rel: Vec2, delta: Vec2, t_lowest: &mut f32) -> Option<Vec2> {
    let HitBox { min, max } = *hit_box;
    let mut normal = None;

    if delta.x > 0.0 && test_wall(t_lowest, min.x, min.y, max.y, rel.x, rel.y, delta.x, delta.y) {
        normal = Some(Vec2::NEG_X);
    }
    if delta.x < 0.0 && test_wall(t_lowest, max.x, min.y, max.y, rel.x, rel.y, delta.x, delta.y) {
        normal = Some(Vec2::X);
    }
    if delta.y > 0.0 && test_wall(t_lowest, min.y, min.x, max.x, rel.y, rel.x, delta.y, delta.x) {
        normal = Some(Vec2::NEG_Y);
    }
    if delta.y < 0.0 && test_wall(t_lowest, max.y, min.x, max.x, rel.y, rel.x, delta.y, delta.x) {
        normal = Some(Vec2::Y);
    }
    normal
}

/// Sweep against a trigger box; any wall crossing counts
fn sweep_trigger(hit_box: &HitBox, rel: Vec2, delta: Vec2, t_hit: &mut f32) -> bool {
    let HitBox { min, max } = *hit_box;
    // Evaluate all four so t_hit ends at the earliest crossing
    let left = test_wall(t_hit, min.x, min.y, max.y, rel.x, rel.y, delta.x, delta.y);
    let right = test_wall(t_hit, max.x, min.y, max.y, rel.x, rel.y, delta.x, delta.y);
    let bottom = test_wall(t_hit, min.y, min.x, max.x, rel.y, rel.x, delta.y, delta.x);
    let top = test_wall(t_hit, max.y, min.x, max.x, rel.y, rel.x, delta.y, delta.x);
    left || right || bottom || top
}

/// Inclusive tile range the sweep can touch, clamped to the grid
fn tile_range(map: &TileMap, player: &Player, old_pos: Vec2, new_pos: Vec2) -> Option<(IVec2, IVec2)> {
    if map.width() <= 0 || map.height() <= 0 || map.tile_size() <= 0 {
        return None;
    }
    let ts = map.tile_size() as f32;
    let old_tile = old_pos / ts;
    let new_tile = new_pos / ts;
    let margin = IVec2::new(
        (player.width / ts) as i32 + 1,
        (player.height / ts) as i32 + 1,
    );

    let min = old_tile.min(new_tile).floor().as_ivec2() - margin;
    let max = old_tile.max(new_tile).ceil().as_ivec2() + margin;

    let min = min.max(IVec2::ZERO);
    let max = max.min(IVec2::new(map.width() - 1, map.height() - 1));
    if min.x > max.x || min.y > max.y {
        return None;
    }
    Some((min, max))
}

/// Integrate one frame of motion and resolve it against the tile map.
///
/// Velocity and position are advanced with constant acceleration, then up to
/// `MAX_COLLISION_ITERATIONS` passes stop the player at the nearest ground
/// wall and slide the remaining motion along it. Coins crossed on the way are
/// cleared from `map`. Gravity is not applied here.
pub fn update_player_position(map: &mut TileMap, player: &mut Player, dt: f32) -> CollisionResult {
    let mut result = CollisionResult::default();

    let old_pos = player.position;
    let new_pos = old_pos + player.velocity * dt + player.acceleration * (0.5 * dt * dt);
    player.velocity += player.acceleration * dt;
    let mut delta = new_pos - old_pos;

    let Some((min_tile, max_tile)) = tile_range(map, player, old_pos, new_pos) else {
        player.position = new_pos;
        return result;
    };

    let ts = map.tile_size() as f32;
    let solid_box = HitBox::expanded(ts, player.width, player.height);
    let spikes_box = HitBox::spikes(ts, player.width, player.height);

    let mut triggers: Vec<(usize, TileFlags, f32)> = Vec::new();
    let mut t_remaining = 1.0_f32;

    for _ in 0..MAX_COLLISION_ITERATIONS {
        if t_remaining <= 0.0 {
            break;
        }
        result.passes += 1;

        let mut t_lowest = 1.0_f32;
        let mut normal: Option<Vec2> = None;
        triggers.clear();

        for tile_y in min_tile.y..=max_tile.y {
            for tile_x in min_tile.x..=max_tile.x {
                let Some(index) = map.index(tile_x, tile_y) else {
                    continue;
                };
                let Some(tile) = map.tile_at(index) else {
                    continue;
                };
                let rel = player.position - map.tile_center(tile_x, tile_y);

                if tile == TileFlags::GROUND {
                    if let Some(n) = sweep_solid(&solid_box, rel, delta, &mut t_lowest) {
                        normal = Some(n);
                    }
                } else if tile.is_trigger() {
                    let hit_box = if tile == TileFlags::SPIKES {
                        &spikes_box
                    } else {
                        &solid_box
                    };
                    let mut t_hit = 1.0_f32;
                    if sweep_trigger(hit_box, rel, delta, &mut t_hit) {
                        triggers.push((index, tile, t_hit));
                    }
                }
            }
        }

        // Only triggers the player actually reaches before stopping count
        for &(index, tile, t_hit) in &triggers {
            if normal.is_some() && t_hit > t_lowest {
                continue;
            }
            if tile == TileFlags::COIN {
                if map.clear_coin(index) {
                    result.touched |= TileFlags::COIN;
                    result.coin_index = Some(index);
                }
            } else {
                result.touched |= tile;
            }
        }

        let Some(n) = normal else {
            player.position += delta;
            break;
        };

        player.position += delta * t_lowest;
        player.velocity = project_out(player.velocity, n);
        player.acceleration = project_out(player.acceleration, n);
        delta = project_out(delta * (1.0 - t_lowest), n);

        result.touched |= TileFlags::GROUND;
        if n == Vec2::Y {
            result.on_ground = true;
        }
        t_remaining -= t_lowest * t_remaining;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    const G: TileFlags = TileFlags::GROUND;
    const E: TileFlags = TileFlags::EMPTY;
    const DT: f32 = 1.0 / 60.0;

    fn small_player() -> Player {
        let mut player = Player::new(&Tuning::default());
        player.width = 16.0;
        player.height = 16.0;
        player
    }

    #[test]
    fn test_wall_parallel_motion_never_hits() {
        let mut t = 1.0;
        assert!(!test_wall(&mut t, 10.0, -5.0, 5.0, 0.0, 0.0, 0.0, 100.0));
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_wall_hit_pulls_back_epsilon() {
        let mut t = 1.0;
        assert!(test_wall(&mut t, 10.0, -5.0, 5.0, 0.0, 0.0, 20.0, 0.0));
        assert!((t - (0.5 - COLLISION_T_EPSILON)).abs() < 1e-6);
    }

    #[test]
    fn test_wall_outside_span_misses() {
        let mut t = 1.0;
        assert!(!test_wall(&mut t, 10.0, -5.0, 5.0, 0.0, 20.0, 20.0, 0.0));
    }

    #[test]
    fn test_wall_behind_or_beyond_misses() {
        let mut t = 1.0;
        // Wall behind the motion
        assert!(!test_wall(&mut t, -10.0, -5.0, 5.0, 0.0, 0.0, 20.0, 0.0));
        // Wall further than this frame reaches
        assert!(!test_wall(&mut t, 30.0, -5.0, 5.0, 0.0, 0.0, 20.0, 0.0));
    }

    #[test]
    fn test_empty_map_moves_freely() {
        let mut map = TileMap::from_rows(&[vec![E, E], vec![E, E]], 32);
        let mut player = small_player();
        player.velocity = Vec2::new(60.0, 0.0);
        let result = update_player_position(&mut map, &mut player, 1.0);
        assert_eq!(player.position, Vec2::new(60.0, 0.0));
        assert!(result.touched.is_empty());
        assert!(!result.on_ground);
    }

    #[test]
    fn test_land_on_ground() {
        let mut map = TileMap::from_rows(&[vec![E], vec![E], vec![G]], 32);
        let mut player = small_player();
        player.position = Vec2::new(0.0, 40.0);
        player.velocity = Vec2::new(0.0, -1200.0);

        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.on_ground);
        assert!(result.touched.contains(TileFlags::GROUND));
        assert_eq!(player.velocity.y, 0.0);
        // Resting on the expanded top wall (16 + 8), never inside it
        assert!(player.position.y >= 24.0);
        assert!(player.position.y < 24.5);
    }

    #[test]
    fn test_wall_blocks_and_slides() {
        // Wall column at x = 2
        let mut map = TileMap::from_rows(&[vec![E, E, G], vec![E, E, G], vec![E, E, G]], 32);
        let mut player = small_player();
        player.position = Vec2::new(32.0, 32.0);
        player.velocity = Vec2::new(1200.0, 300.0);

        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::GROUND));
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.velocity.y, 300.0);
        // Left face of the wall is at 64 - 24 = 40
        assert!(player.position.x <= 40.0);
        // Vertical motion kept going
        assert!(player.position.y > 32.0);
    }

    #[test]
    fn test_walk_across_tile_seams() {
        let mut map = TileMap::from_rows(&[vec![E, E, E, E], vec![G, G, G, G]], 32);
        let mut player = small_player();
        player.position = Vec2::new(0.0, 24.5);
        player.velocity = Vec2::new(300.0, 0.0);

        for _ in 0..20 {
            player.acceleration = Vec2::new(0.0, -1500.0);
            update_player_position(&mut map, &mut player, DT);
        }
        assert!(player.position.x > 90.0, "stuck at {}", player.position.x);
        assert!(player.position.y >= 24.0);
    }

    #[test]
    fn test_trigger_does_not_block() {
        let mut map = TileMap::from_rows(&[vec![E, TileFlags::DEATH, E]], 32);
        let mut player = small_player();
        player.velocity = Vec2::new(3840.0, 0.0);

        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::DEATH));
        assert_eq!(player.position, Vec2::new(64.0, 0.0));
        assert_eq!(player.velocity, Vec2::new(3840.0, 0.0));
    }

    #[test]
    fn test_spikes_box_is_smaller() {
        let mut map = TileMap::from_rows(&[vec![E], vec![TileFlags::SPIKES]], 96);
        let mut player = small_player();
        // Full box would be touched at this height, the spikes box is not
        player.position = Vec2::new(-200.0, 50.0);
        player.velocity = Vec2::new(24_000.0, 0.0);
        let result = update_player_position(&mut map, &mut player, DT);
        assert!(!result.touched.contains(TileFlags::SPIKES));

        player.position = Vec2::new(-200.0, 0.0);
        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::SPIKES));
    }

    #[test]
    fn test_coin_is_consumed_once() {
        let mut map = TileMap::from_rows(&[vec![E, TileFlags::COIN, E]], 32);
        let coin = map.index(1, 0).unwrap();

        let mut player = small_player();
        player.velocity = Vec2::new(3840.0, 0.0);
        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::COIN));
        assert_eq!(result.coin_index, Some(coin));
        assert_eq!(map.tile_at(coin), Some(E));

        // Walk back over the same spot
        player.velocity = Vec2::new(-3840.0, 0.0);
        let result = update_player_position(&mut map, &mut player, DT);
        assert!(!result.touched.contains(TileFlags::COIN));
        assert_eq!(result.coin_index, None);
    }

    #[test]
    fn test_trigger_behind_wall_is_not_reported() {
        // Player stops at the ground column before reaching the coin
        let mut map = TileMap::from_rows(&[vec![E, G, TileFlags::COIN]], 32);
        let mut player = small_player();
        player.velocity = Vec2::new(6000.0, 0.0);
        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::GROUND));
        assert!(!result.touched.contains(TileFlags::COIN));
        assert_eq!(map.tile_at(map.index(2, 0).unwrap()), Some(TileFlags::COIN));
    }

    #[test]
    fn test_landing_keeps_tangent_velocity() {
        let mut map = TileMap::from_rows(&[vec![E, E], vec![E, G]], 32);
        let mut player = small_player();
        // Above the tile's left half, heading down-right
        player.position = Vec2::new(20.0, 40.0);
        player.velocity = Vec2::new(600.0, -1200.0);

        let result = update_player_position(&mut map, &mut player, DT);
        assert!(result.touched.contains(TileFlags::GROUND));
        assert!(result.on_ground);
        assert_eq!(player.velocity.dot(Vec2::Y), 0.0);
        assert_eq!(player.velocity.x, 600.0);
    }

    #[test]
    fn test_player_outside_grid() {
        let mut map = TileMap::from_rows(&[vec![G]], 32);
        let mut player = small_player();
        player.position = Vec2::new(-5000.0, -5000.0);
        player.velocity = Vec2::new(10.0, 10.0);
        let result = update_player_position(&mut map, &mut player, 1.0);
        assert!(result.touched.is_empty());
        assert_eq!(player.position, Vec2::new(-4990.0, -4990.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn tile_strategy() -> impl Strategy<Value = TileFlags> {
            prop_oneof![
                4 => Just(TileFlags::EMPTY),
                3 => Just(TileFlags::GROUND),
                1 => Just(TileFlags::COIN),
                1 => Just(TileFlags::DEATH),
                1 => Just(TileFlags::SPIKES),
                1 => Just(TileFlags::END),
            ]
        }

        fn map_strategy() -> impl Strategy<Value = TileMap> {
            (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
                proptest::collection::vec(proptest::collection::vec(tile_strategy(), w), h)
                    .prop_map(|rows| TileMap::from_rows(&rows, 32))
            })
        }

        proptest! {
            #[test]
            fn at_rest_never_drifts(
                mut map in map_strategy(),
                x in -64.0f32..300.0,
                y in -64.0f32..300.0,
                dt in 0.0f32..0.1,
            ) {
                let mut player = small_player();
                player.position = Vec2::new(x, y);
                let result = update_player_position(&mut map, &mut player, dt);
                prop_assert_eq!(player.position, Vec2::new(x, y));
                prop_assert_eq!(player.velocity, Vec2::ZERO);
                prop_assert!(result.touched.is_empty());
            }

            #[test]
            fn resolver_always_terminates(
                mut map in map_strategy(),
                x in -64.0f32..300.0,
                y in -64.0f32..300.0,
                vx in -5000.0f32..5000.0,
                vy in -5000.0f32..5000.0,
                ay in -100_000.0f32..100_000.0,
                dt in 0.0f32..0.1,
            ) {
                let mut player = small_player();
                player.position = Vec2::new(x, y);
                player.velocity = Vec2::new(vx, vy);
                player.acceleration = Vec2::new(0.0, ay);
                let result = update_player_position(&mut map, &mut player, dt);
                prop_assert!(result.passes <= MAX_COLLISION_ITERATIONS);
                prop_assert!(player.position.is_finite());
                prop_assert!(player.velocity.is_finite());
            }

            #[test]
            fn triggers_alone_never_obstruct(
                tiles in proptest::collection::vec(
                    prop_oneof![
                        Just(TileFlags::EMPTY),
                        Just(TileFlags::DEATH),
                        Just(TileFlags::SPIKES),
                        Just(TileFlags::END),
                        Just(TileFlags::COIN),
                    ],
                    1..8,
                ),
                vx in -3000.0f32..3000.0,
                vy in -3000.0f32..3000.0,
            ) {
                let mut map = TileMap::from_rows(&[tiles], 32);
                let mut player = small_player();
                player.velocity = Vec2::new(vx, vy);
                update_player_position(&mut map, &mut player, DT);
                let expected = Vec2::new(vx, vy) * DT;
                prop_assert!((player.position - expected).length() < 1e-3);
                prop_assert_eq!(player.velocity, Vec2::new(vx, vy));
            }

            #[test]
            fn solid_contact_removes_normal_velocity(
                vx in 100.0f32..2000.0,
                vy in -2000.0f32..-100.0,
            ) {
                let mut map = TileMap::from_rows(&[vec![E, E], vec![E, G]], 32);
                let mut player = small_player();
                player.position = Vec2::new(0.0, 40.0);
                player.velocity = Vec2::new(vx, vy);
                let result = update_player_position(&mut map, &mut player, DT);
                if result.touched.contains(TileFlags::GROUND) {
                    // Either the top or the left face stopped us; that axis is zero,
                    // the other is untouched.
                    let stopped_x = player.velocity.x == 0.0 && player.velocity.y == vy;
                    let stopped_y = player.velocity.y == 0.0 && player.velocity.x == vx;
                    prop_assert!(stopped_x || stopped_y);
                }
            }
        }
    }
}
