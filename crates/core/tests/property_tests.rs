//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Meters: health and power never leave [0, max]
//! - Platforms: a resting body never sinks or jitters
//! - Grace window: continuous overlap only hurts once per window
//! - Pipeline: identical inputs give identical worlds

use proptest::prelude::*;

use scrollfight_core::collision::Rect;
use scrollfight_core::enemy::{Archetype, Enemy};
use scrollfight_core::physics::{Body, Physics};
use scrollfight_core::player::Player;
use scrollfight_core::{Buttons, Params, Phase, Skin, World};

#[derive(Debug, Clone)]
enum MeterOp {
    Damage(f32),
    Heal(f32),
    Spend(f32),
    Refund(f32),
    Tick(f32),
}

fn meter_op() -> impl Strategy<Value = MeterOp> {
    prop_oneof![
        (-50.0f32..500.0).prop_map(MeterOp::Damage),
        (-50.0f32..500.0).prop_map(MeterOp::Heal),
        (-10.0f32..200.0).prop_map(MeterOp::Spend),
        (-10.0f32..200.0).prop_map(MeterOp::Refund),
        (0.0f32..2.0).prop_map(MeterOp::Tick),
    ]
}

fn skin() -> impl Strategy<Value = Skin> {
    prop::sample::select(Skin::ALL.to_vec())
}

// ============================================================
// Meter Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_meters_stay_in_range(skin in skin(), ops in prop::collection::vec(meter_op(), 1..200)) {
        let params = Params::for_skin(skin);
        let mut p = Player::new(&params, 100.0, 510.0);
        for op in ops {
            match op {
                MeterOp::Damage(d) => { p.take_damage(&params, d); }
                MeterOp::Heal(h) => { p.health.add(h); }
                MeterOp::Spend(c) => {
                    let before = p.power.value();
                    let spent = p.power.spend(c);
                    if !spent {
                        prop_assert_eq!(p.power.value(), before);
                    }
                }
                MeterOp::Refund(d) => p.reward_hit(&params, d),
                MeterOp::Tick(dt) => p.tick_timers(&params, dt),
            }
            prop_assert!(p.health.value() >= 0.0 && p.health.value() <= p.health.max());
            prop_assert!(p.power.value() >= 0.0 && p.power.value() <= p.power.max());
        }
    }
}

// ============================================================
// Physics Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_resting_body_is_stable(
        plat_y in 100.0f32..550.0,
        gravity in 0.05f32..2.0,
        h in 10.0f32..80.0,
        ticks in 1usize..300,
    ) {
        let physics = Physics { gravity, max_fall: 15.0, level_width: 2000.0, void_y: 700.0 };
        let plat = Rect::new(0.0, plat_y, 2000.0, 20.0);
        let mut b = Body::new(500.0, plat_y - h, 30.0, h);
        physics.step(&mut b, &[plat], 1.0, 1.0);
        let rest_y = b.y;
        prop_assert!(b.grounded);
        for _ in 0..ticks {
            physics.step(&mut b, &[plat], 1.0, 1.0);
            prop_assert_eq!(b.y, rest_y);
            prop_assert_eq!(b.vy, 0.0);
            prop_assert!(b.grounded);
        }
    }
}

// ============================================================
// Combat Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_contact_damage_once_per_grace_window(
        archetype in prop::sample::select(Archetype::ALL.to_vec()),
        frames in 1u32..59,
    ) {
        let mut w = World::new(Params::default(), 9);
        w.start();
        let x = w.player.body.x;
        let ground_y = w.level.ground.y;
        w.enemies = vec![Enemy::spawn(1000, archetype, x, ground_y, (x, x), 0.0, None)];

        w.step(Buttons::empty(), 1.0);
        let after_first = w.player.health.value();
        prop_assert_eq!(after_first, w.params.max_health - archetype.stats().contact_damage);
        for _ in 0..frames {
            w.enemies[0].body.x = w.player.body.x;
            w.step(Buttons::empty(), 1.0);
        }
        prop_assert_eq!(w.player.health.value(), after_first);
    }
}

// ============================================================
// Pipeline Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_pipeline_is_deterministic_and_bounded(
        skin in skin(),
        seed in any::<u64>(),
        inputs in prop::collection::vec((0u8..32, 0.0f32..3.0), 1..400),
    ) {
        let run = || {
            let mut w = World::new(Params::for_skin(skin), seed);
            w.start();
            for &(bits, dt) in &inputs {
                w.step(Buttons::from_bits_truncate(bits), dt);
                let p = &w.player;
                assert!(p.health.value() >= 0.0 && p.health.value() <= p.health.max());
                assert!(p.power.value() >= 0.0 && p.power.value() <= p.power.max());
                assert!(w.camera.x >= 0.0 && w.camera.x <= (w.level.width - w.params.viewport_w).max(0.0));
            }
            w
        };
        let a = run();
        let b = run();
        prop_assert_eq!(&a, &b);
        if a.phase == Phase::Clear {
            prop_assert!(a.enemies.is_empty());
            prop_assert!(a.player.body.x > a.level.exit_x());
        }
        if a.phase == Phase::Over {
            prop_assert_eq!(a.player.health.value(), 0.0);
        }
    }
}
