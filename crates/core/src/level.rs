//! Arena generation. A given seed and level number always yield the same
//! ground, platforms and roster.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::collision::Rect;
use crate::enemy::{Archetype, Enemy, EnemyTuning};
use crate::params::Params;
use crate::physics::Physics;

/// Enemies never spawn closer than this to the level start.
const SAFE_ZONE: f32 = 400.0;
/// The player must pass `width - EXIT_ZONE` to clear a level.
pub const EXIT_ZONE: f32 = 100.0;
pub const PLAYER_SPAWN_X: f32 = 100.0;
const PLATFORM_H: f32 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub number: u32,
    pub width: f32,
    pub ground: Rect,
    pub platforms: Vec<Rect>,
}

impl Level {
    /// Ground first, then floating platforms.
    pub fn surfaces(&self) -> impl Iterator<Item = &Rect> {
        std::iter::once(&self.ground).chain(self.platforms.iter())
    }

    pub fn exit_x(&self) -> f32 {
        self.width - EXIT_ZONE
    }

    pub fn physics(&self, params: &Params) -> Physics {
        Physics {
            gravity: params.gravity,
            max_fall: params.max_fall,
            level_width: self.width,
            void_y: params.viewport_h + 100.0,
        }
    }

    pub fn enemy_tuning(&self, params: &Params) -> EnemyTuning {
        EnemyTuning {
            aggro_range: params.enemy.aggro_range,
            windup: params.enemy.windup,
            attack_interval: ranged_interval(params, self.number),
            projectile_speed: params.enemy.projectile_speed,
            projectile_damage: params.enemy.projectile_damage,
            projectile_lifetime: params.enemy.projectile_lifetime,
            aim: params.enemy.aim,
        }
    }
}

pub fn ranged_interval(params: &Params, number: u32) -> f32 {
    let l = &params.level;
    (l.ranged_interval - number as f32 * l.ranged_interval_step).max(l.ranged_interval_min)
}

pub fn enemy_count(params: &Params, number: u32) -> u32 {
    params.level.enemy_base_count + number * params.level.enemy_count_step
}

fn level_rng(seed: u64, number: u32) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ (number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn pick_archetype(rng: &mut impl Rng, number: u32) -> Archetype {
    let n = number as i32;
    let weights = [
        (Archetype::Light, (50 - 5 * n).max(20)),
        (Archetype::Medium, 30),
        (Archetype::Heavy, (5 + 5 * n).min(30)),
        (Archetype::Ranged, (10 + 2 * n).min(20)),
    ];
    let total: i32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (archetype, w) in weights {
        if roll < w {
            return archetype;
        }
        roll -= w;
    }
    Archetype::Light
}

/// Build level `number`. Enemy ids continue from `next_id`.
pub fn build(params: &Params, seed: u64, number: u32, next_id: &mut u32) -> (Level, Vec<Enemy>) {
    let mut rng = level_rng(seed, number);
    let width = params.level.base_width + number.saturating_sub(1) as f32 * params.level.width_per_level;
    let ground_y = params.viewport_h - params.ground_height;
    let ground = Rect::new(0.0, ground_y, width, params.ground_height);

    let count = params.level.platform_count + number;
    let span = (width - 2.0 * SAFE_ZONE).max(0.0);
    let slot = span / count.max(1) as f32;
    let mut platforms = Vec::with_capacity(count as usize);
    for i in 0..count {
        let w = rng.gen_range(100.0..200.0_f32).min(slot.max(1.0));
        let x = SAFE_ZONE + i as f32 * slot + rng.gen_range(0.0..=(slot - w).max(0.0));
        let y = ground_y - rng.gen_range(80.0..=200.0_f32);
        platforms.push(Rect::new(x, y, w, PLATFORM_H));
    }

    let interval = ranged_interval(params, number);
    let health_bonus = number as f32 * params.level.enemy_health_per_level;
    let max_x = (width - EXIT_ZONE * 2.0).max(SAFE_ZONE + 1.0);
    let mut enemies = Vec::new();
    for _ in 0..enemy_count(params, number) {
        let archetype = pick_archetype(&mut rng, number);
        let w = archetype.stats().w;
        let x = rng.gen_range(SAFE_ZONE..max_x);
        let reach = rng.gen_range(100.0..=300.0_f32) * 0.5;
        let left = (x - reach).max(SAFE_ZONE * 0.5);
        let right = (x + reach).min(width - w);
        let id = *next_id;
        *next_id += 1;
        enemies.push(Enemy::spawn(
            id,
            archetype,
            x.min(right),
            ground_y,
            (left, right),
            health_bonus,
            Some(interval),
        ));
    }

    (Level { number, width, ground, platforms }, enemies)
}

#[cfg(test)]
mod tests {
    use super::{build, enemy_count, ranged_interval, SAFE_ZONE};
    use crate::params::Params;

    #[test]
    fn same_seed_same_arena() {
        let params = Params::default();
        let (mut a, mut b) = (0, 0);
        assert_eq!(build(&params, 7, 3, &mut a), build(&params, 7, 3, &mut b));
        let (mut c, mut d) = (0, 0);
        assert_ne!(build(&params, 7, 3, &mut c).0, build(&params, 8, 3, &mut d).0);
    }

    #[test]
    fn roster_scales_with_level() {
        let params = Params::default();
        let mut id = 0;
        let (_, l1) = build(&params, 1, 1, &mut id);
        let (_, l4) = build(&params, 1, 4, &mut id);
        assert_eq!(l1.len() as u32, enemy_count(&params, 1));
        assert_eq!(l4.len() as u32, enemy_count(&params, 4));
        assert!(l4.len() > l1.len());
        assert!(l4.iter().all(|e| e.health.max() >= e.archetype.stats().health + 4.0));
        assert_eq!(id as usize, l1.len() + l4.len());
    }

    #[test]
    fn ground_spans_level_and_enemies_stand_on_it() {
        let params = Params::default();
        let mut id = 0;
        let (level, enemies) = build(&params, 42, 2, &mut id);
        assert_eq!(level.ground.x, 0.0);
        assert_eq!(level.ground.w, level.width);
        assert_eq!(level.ground.h, 40.0);
        for e in &enemies {
            assert_eq!(e.body.y + e.body.h, level.ground.y);
            assert!(e.patrol_left <= e.body.x && e.body.x <= e.patrol_right);
            assert!(e.patrol_right + e.body.w <= level.width);
            assert!(e.body.x >= SAFE_ZONE * 0.5);
        }
        for p in &level.platforms {
            assert!(p.y < level.ground.y);
            assert!(p.right() <= level.width);
        }
    }

    #[test]
    fn ranged_interval_shortens_but_is_floored() {
        let params = Params::default();
        assert!(ranged_interval(&params, 2) < ranged_interval(&params, 1));
        assert_eq!(ranged_interval(&params, 1000), params.level.ranged_interval_min);
    }
}
