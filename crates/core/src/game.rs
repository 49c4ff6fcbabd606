//! Level lifecycle and the per-tick pipeline.
//!
//! `World` is the whole simulation state and is plain data: clone it,
//! compare it, hand it to a renderer by shared reference. `Game` wraps a
//! world with the caller-facing input state and the snapshot listener.

use serde::Serialize;
use tracing::{debug, info};

use crate::attack::{self, DamageEvent, Effects, Projectile};
use crate::camera::Camera;
use crate::clock::clamp_dt;
use crate::enemy::Enemy;
use crate::error::CoreError;
use crate::input::{Action, Buttons, InputState};
use crate::level::{self, Level, PLAYER_SPAWN_X};
use crate::params::{Params, Skin};
use crate::player::Player;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Clear,
    Over,
    Complete,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::Clear => "clear",
            Phase::Over => "over",
            Phase::Complete => "complete",
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Per-tick happenings for hosts that play sounds or spawn particles.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Events {
    pub jumped: u8,
    pub landed: u8,
    pub attacked: u8,
    pub special: u8,
    pub hits: u32,
    pub kills: u32,
    pub shots_fired: u32,
    pub damage_taken: f32,
    pub fell: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub health: f32,
    pub max_health: f32,
    pub power: f32,
    pub max_power: f32,
    pub level: u32,
    pub phase: Phase,
    pub combo: u32,
    pub camera_x: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub params: Params,
    pub seed: u64,
    pub phase: Phase,
    pub level: Level,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub effects: Effects,
    pub enemy_projectiles: Vec<Projectile>,
    pub camera: Camera,
    pub score: u64,
    pub frame: u64,
    next_enemy_id: u32,
}

impl World {
    pub fn new(params: Params, seed: u64) -> Self {
        let mut next_enemy_id = 0;
        let (level, enemies) = level::build(&params, seed, 1, &mut next_enemy_id);
        let player = spawn_player(&params, &level);
        Self {
            params,
            seed,
            phase: Phase::Idle,
            level,
            player,
            enemies,
            effects: Effects::default(),
            enemy_projectiles: Vec::new(),
            camera: Camera::default(),
            score: 0,
            frame: 0,
            next_enemy_id,
        }
    }

    /// Discard everything and begin at level 1.
    pub fn start(&mut self) {
        *self = World::new(self.params, self.seed);
        self.phase = Phase::Playing;
        info!(target: "scrollfight_core::game", seed = self.seed, enemies = self.enemies.len(), "game started");
    }

    /// Advance from `Clear` to the next level, or to `Complete` past the last one.
    pub fn next_level(&mut self) -> Result<Phase, CoreError> {
        if self.phase != Phase::Clear {
            return Err(CoreError::InvalidTransition {
                op: "advance level",
                phase: self.phase,
            });
        }

        if let Some(last) = self.params.level.max_levels {
            if self.level.number >= last {
                self.phase = Phase::Complete;
                info!(target: "scrollfight_core::game", score = self.score, "all levels complete");
                return Ok(self.phase);
            }
        }

        let number = self.level.number + 1;
        let (level, enemies) = level::build(&self.params, self.seed, number, &mut self.next_enemy_id);
        self.teardown();
        self.camera.reset();
        self.level = level;
        self.enemies = enemies;

        let spawn = spawn_player(&self.params, &self.level);
        let p = &mut self.player;
        p.health.add(p.health.max() * self.params.level.heal_fraction);
        p.power.set(self.params.power.start);
        p.body = spawn.body;
        p.facing = spawn.facing;
        p.action = spawn.action;
        p.attack_timer = 0.0;
        p.special_timer = 0.0;
        p.invincible_timer = 0.0;
        p.combo = 0;
        p.combo_timer = 0.0;

        self.phase = Phase::Playing;
        info!(target: "scrollfight_core::game", level = number, enemies = self.enemies.len(), "next level");
        Ok(self.phase)
    }

    fn teardown(&mut self) {
        self.effects.clear();
        self.enemy_projectiles.clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            health: self.player.health.value(),
            max_health: self.player.health.max(),
            power: self.player.power.value(),
            max_power: self.player.power.max(),
            level: self.level.number,
            phase: self.phase,
            combo: self.player.combo,
            camera_x: self.camera.x,
        }
    }

    /// One simulation tick. Does nothing unless `Playing`.
    pub fn step(&mut self, buttons: Buttons, dt: f32) -> Events {
        let mut ev = Events::default();
        if self.phase != Phase::Playing {
            return ev;
        }
        let dt = clamp_dt(dt);
        self.frame += 1;

        let params = self.params;
        let physics = self.level.physics(&params);

        // Input edges drive the state machine; the attacks themselves resolve after movement.
        let triggers = self.player.apply_input(&params, buttons, dt);
        ev.jumped = triggers.jumped as u8;
        let special_multiplier = self.player.combo_multiplier(&params);

        // Player physics.
        let gravity_scale = self.player.gravity_scale(&params);
        let contact = physics.step(&mut self.player.body, self.level.surfaces(), gravity_scale, dt);
        ev.landed = contact.landed as u8;
        if contact.fell_into_void {
            self.player.health.empty();
            ev.fell = 1;
        }

        self.player.tick_timers(&params, dt);

        // Enemy AI and contact damage.
        let tuning = self.level.enemy_tuning(&params);
        let target = self.player.body.rect();
        for enemy in self.enemies.iter_mut() {
            if let Some(shot) = enemy.update(&target, &tuning, dt) {
                self.enemy_projectiles.push(shot);
                ev.shots_fired += 1;
            }
            if enemy.touches(&self.player.body.rect()) {
                ev.damage_taken += self.player.take_damage(&params, enemy.contact_damage());
            }
        }

        let player_rect = self.player.body.rect();
        let mut incoming = 0.0;
        self.enemy_projectiles.retain_mut(|p| {
            if !p.advance(&physics, dt) {
                return false;
            }
            if p.hits(&player_rect) {
                incoming += p.damage;
                return false;
            }
            true
        });
        if incoming > 0.0 {
            ev.damage_taken += self.player.take_damage(&params, incoming);
        }

        // This tick's triggers, from the post-physics position.
        if triggers.attack {
            ev.attacked = 1;
            let hits = attack::resolve(&self.player, &params.attack, 1.0, &mut self.enemies, &mut self.effects);
            self.apply_hits(&hits, &mut ev);
        }
        if triggers.special {
            ev.special = 1;
            let hits = attack::resolve(
                &self.player,
                &params.special.variant,
                special_multiplier,
                &mut self.enemies,
                &mut self.effects,
            );
            self.apply_hits(&hits, &mut ev);
        }

        // Player projectiles, rings and delayed effects.
        let hits = self.effects.advance(&mut self.enemies, &physics, dt);
        self.apply_hits(&hits, &mut ev);

        self.camera.follow(
            self.player.body.x,
            params.viewport_w,
            self.level.width,
            params.camera_lead,
            params.camera_smoothing,
            dt,
        );

        if !self.player.is_alive() {
            self.phase = Phase::Over;
            info!(target: "scrollfight_core::game", score = self.score, level = self.level.number, fell = ev.fell != 0, "game over");
        } else if self.enemies.is_empty() && self.player.body.x > self.level.exit_x() {
            self.phase = Phase::Clear;
            self.teardown();
            info!(target: "scrollfight_core::game", score = self.score, level = self.level.number, "level clear");
        }

        ev
    }

    fn apply_hits(&mut self, hits: &[DamageEvent], ev: &mut Events) {
        if hits.is_empty() {
            return;
        }
        for h in hits {
            self.player.reward_hit(&self.params, h.damage);
            ev.hits += 1;
            if h.killed {
                self.score += h.value as u64;
                ev.kills += 1;
                debug!(target: "scrollfight_core::game", enemy = h.enemy_id, value = h.value, score = self.score, "enemy defeated");
            }
        }
        self.enemies.retain(Enemy::is_alive);
    }
}

fn spawn_player(params: &Params, level: &Level) -> Player {
    let mut p = Player::new(params, PLAYER_SPAWN_X, level.ground.y - params.player_h);
    p.body.grounded = true;
    p
}

type Listener = Box<dyn FnMut(&Snapshot)>;

/// Host-facing wrapper: owns the held-key state and pushes a [`Snapshot`]
/// after every tick and lifecycle transition.
pub struct Game {
    world: World,
    input: InputState,
    listener: Option<Listener>,
}

impl Game {
    pub fn new(params: Params, seed: u64) -> Result<Self, CoreError> {
        params.validate()?;
        Ok(Self {
            world: World::new(params, seed),
            input: InputState::default(),
            listener: None,
        })
    }

    pub fn for_skin(skin: Skin, seed: u64) -> Self {
        Self {
            world: World::new(Params::for_skin(skin), seed),
            input: InputState::default(),
            listener: None,
        }
    }

    pub fn on_snapshot(&mut self, f: impl FnMut(&Snapshot) + 'static) {
        self.listener = Some(Box::new(f));
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn phase(&self) -> Phase {
        self.world.phase
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    pub fn set_key(&mut self, action: Action, pressed: bool) {
        self.input.set_key(action, pressed);
    }

    pub fn set_buttons(&mut self, bits: u8) {
        self.input.set_bits(bits);
    }

    pub fn start(&mut self) {
        self.world.start();
        self.input.clear();
        self.push();
    }

    pub fn next_level(&mut self) -> Result<Phase, CoreError> {
        let phase = self.world.next_level()?;
        self.push();
        Ok(phase)
    }

    pub fn tick(&mut self, dt: f32) -> Events {
        let ev = self.world.step(self.input.buttons(), dt);
        self.push();
        ev
    }

    fn push(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.world.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Game, Phase, World};
    use crate::enemy::{Archetype, Enemy};
    use crate::error::CoreError;
    use crate::input::{Action, Buttons};
    use crate::params::{Params, Skin};

    fn playing_world() -> World {
        let mut w = World::new(Params::default(), 1);
        w.start();
        w
    }

    fn enemy_on_ground(w: &World, id: u32, archetype: Archetype, x: f32) -> Enemy {
        Enemy::spawn(id, archetype, x, w.level.ground.y, (x, x), 0.0, None)
    }

    #[test]
    fn idle_world_does_not_tick() {
        let mut w = World::new(Params::default(), 1);
        let before = w.clone();
        w.step(Buttons::RIGHT, 1.0);
        assert_eq!(w, before);
    }

    #[test]
    fn melee_kill_scores_and_refunds() {
        let mut w = playing_world();
        let params = w.params;
        w.player.body.x = 50.0;
        w.player.power.set(50.0);
        w.enemies = vec![enemy_on_ground(&w, 99, Archetype::Light, 100.0)];

        let ev = w.step(Buttons::ATTACK, 1.0);

        assert_eq!(ev.kills, 1);
        assert!(w.enemies.is_empty());
        assert_eq!(w.score, Archetype::Light.stats().value as u64);
        let refund = 2.0 * params.power.refund_per_damage;
        let expected = 50.0 - params.power.attack_cost + refund + params.power.regen;
        assert!((w.player.power.value() - expected).abs() < 1e-4);
    }

    #[test]
    fn melee_window_follows_this_ticks_movement() {
        let mut w = playing_world();
        assert_eq!(w.player.body.x, 100.0);
        w.enemies = vec![enemy_on_ground(&w, 99, Archetype::Light, 192.0)];

        let ev = w.step(Buttons::RIGHT | Buttons::ATTACK, 1.0);

        assert_eq!(w.player.body.x, 100.0 + w.params.move_speed);
        assert_eq!(ev.attacked, 1);
        assert_eq!(ev.hits, 1);
        assert_eq!(ev.kills, 1);
        assert!(w.enemies.is_empty());
    }

    #[test]
    fn float_special_lightens_gravity_and_slows_movement() {
        let mut w = World::new(Params::for_skin(Skin::VampireHunter), 2);
        w.start();
        let params = w.params;
        let fall = params.gravity * params.special.gravity_factor;
        assert!(fall < params.gravity);
        w.player.power.set(params.power.max);
        w.player.body.y = 200.0;
        w.player.body.grounded = false;

        let ev = w.step(Buttons::SPECIAL, 1.0);
        assert_eq!(ev.special, 1);
        assert!(w.player.special_active());
        assert!((w.player.body.vy - fall).abs() < 1e-6);

        let vy = w.player.body.vy;
        w.step(Buttons::RIGHT, 1.0);
        assert_eq!(w.player.body.vx, params.move_speed * params.special.move_factor);
        assert!((w.player.body.vy - vy - fall).abs() < 1e-6);
    }

    #[test]
    fn lethal_contact_ends_game_same_tick() {
        let mut w = playing_world();
        w.player.health.set(10.0);
        let x = w.player.body.x;
        w.enemies = vec![enemy_on_ground(&w, 99, Archetype::Medium, x)];
        assert_eq!(Archetype::Medium.stats().contact_damage, 15.0);

        w.step(Buttons::empty(), 1.0);

        assert_eq!(w.player.health.value(), 0.0);
        assert_eq!(w.phase, Phase::Over);
    }

    #[test]
    fn continuous_overlap_respects_grace_window() {
        let mut w = playing_world();
        let x = w.player.body.x;
        w.enemies = vec![enemy_on_ground(&w, 99, Archetype::Light, x)];
        let frames = w.params.invincible_frames as u32;

        w.step(Buttons::empty(), 1.0);
        let after_first = w.player.health.value();
        assert_eq!(after_first, 90.0);
        for _ in 1..frames {
            w.enemies[0].body.x = w.player.body.x;
            w.step(Buttons::empty(), 1.0);
            assert_eq!(w.player.health.value(), after_first);
        }
        w.enemies[0].body.x = w.player.body.x;
        w.step(Buttons::empty(), 1.0);
        assert_eq!(w.player.health.value(), 80.0);
    }

    #[test]
    fn last_kill_mid_level_is_not_a_clear() {
        let mut w = playing_world();
        w.player.body.x = 500.0;
        let mut e = enemy_on_ground(&w, 99, Archetype::Light, 550.0);
        e.health.set(1.0);
        w.enemies = vec![e];
        w.step(Buttons::ATTACK, 1.0);
        assert!(w.enemies.is_empty());
        assert_eq!(w.phase, Phase::Playing);

        w.player.body.x = w.level.exit_x() + 1.0;
        w.step(Buttons::empty(), 1.0);
        assert_eq!(w.phase, Phase::Clear);
    }

    #[test]
    fn exit_with_enemies_left_is_not_a_clear() {
        let mut w = playing_world();
        w.player.body.x = w.level.width - 50.0;
        assert!(!w.enemies.is_empty());
        w.step(Buttons::empty(), 1.0);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn void_fall_is_defeat() {
        let mut w = playing_world();
        w.player.body.y = w.params.viewport_h + 200.0;
        w.player.body.grounded = false;
        let ev = w.step(Buttons::empty(), 1.0);
        assert_eq!(ev.fell, 1);
        assert_eq!(w.phase, Phase::Over);
        assert_eq!(w.player.health.value(), 0.0);
    }

    #[test]
    fn next_level_requires_clear_and_rebuilds() {
        let mut w = playing_world();
        assert!(matches!(w.next_level(), Err(CoreError::InvalidTransition { .. })));

        w.enemies.clear();
        w.player.health.set(50.0);
        w.player.body.x = w.level.exit_x() + 10.0;
        w.step(Buttons::empty(), 1.0);
        assert_eq!(w.phase, Phase::Clear);
        let cam = w.camera.x;
        assert!(cam > 0.0);
        assert_eq!(w.snapshot().camera_x, cam);

        let width = w.level.width;
        assert_eq!(w.next_level().unwrap(), Phase::Playing);
        assert_eq!(w.level.number, 2);
        assert!(w.level.width > width);
        assert!(!w.enemies.is_empty());
        assert_eq!(w.player.health.value(), 50.0 + 100.0 * w.params.level.heal_fraction);
        assert_eq!(w.player.power.value(), w.params.power.start);
        assert_eq!(w.camera.x, 0.0);
        assert!(w.effects.is_empty());
    }

    #[test]
    fn past_the_last_level_is_complete() {
        let mut params = Params::default();
        params.level.max_levels = Some(1);
        let mut w = World::new(params, 3);
        w.start();
        w.enemies.clear();
        w.player.body.x = w.level.exit_x() + 10.0;
        w.step(Buttons::empty(), 1.0);
        assert_eq!(w.next_level().unwrap(), Phase::Complete);
        let before = w.clone();
        w.step(Buttons::RIGHT, 1.0);
        assert_eq!(w, before);
    }

    #[test]
    fn start_discards_previous_session() {
        let mut w = playing_world();
        w.score = 1234;
        w.player.health.set(1.0);
        w.phase = Phase::Over;
        w.start();
        assert_eq!(w.score, 0);
        assert_eq!(w.level.number, 1);
        assert_eq!(w.player.health.value(), w.params.max_health);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn snapshot_is_pushed_after_every_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::for_skin(Skin::VampireHunter, 5);
        let sink = Rc::clone(&seen);
        game.on_snapshot(move |s| sink.borrow_mut().push(*s));

        game.start();
        game.set_key(Action::Right, true);
        for _ in 0..3 {
            game.tick(1.0);
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|s| s.phase == Phase::Playing && s.level == 1));
        assert_eq!(*seen.last().unwrap(), game.snapshot());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut params = Params::default();
        params.max_health = 0.0;
        assert!(matches!(Game::new(params, 0), Err(CoreError::Config(_))));
    }
}
