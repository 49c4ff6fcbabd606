//! Player resource/state machine.
//!
//! `attacking` is the only exclusive action state. The special runs on its
//! own timer; for non-layered skins it blocks attacks (and attacking blocks
//! it), for layered skins it is a time-boxed modifier on top of whatever the
//! player is doing. Invincibility overlays everything.

use serde::Serialize;
use tracing::trace;

use crate::input::{rising_edges, Buttons};
use crate::meter::Meter;
use crate::params::{MovementMode, Params};
use crate::physics::{Body, Facing};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    #[default]
    Idle,
    Attacking,
}

/// What fired this tick; the caller runs the attack resolver for these.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Triggers {
    pub jumped: bool,
    pub attack: bool,
    pub special: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub health: Meter,
    pub power: Meter,
    pub action: ActionState,
    pub attack_timer: f32,
    pub special_timer: f32,
    pub invincible_timer: f32,
    pub combo: u32,
    pub combo_timer: f32,
    pub buttons_was_down: Buttons,
}

impl Player {
    pub fn new(params: &Params, x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, params.player_w, params.player_h),
            facing: Facing::Right,
            health: Meter::full(params.max_health),
            power: Meter::with_value(params.power.start, params.power.max),
            action: ActionState::Idle,
            attack_timer: 0.0,
            special_timer: 0.0,
            invincible_timer: 0.0,
            combo: 0,
            combo_timer: 0.0,
            buttons_was_down: Buttons::empty(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.action == ActionState::Attacking
    }

    #[inline]
    pub fn special_active(&self) -> bool {
        self.special_timer > 0.0
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn gravity_scale(&self, params: &Params) -> f32 {
        if self.special_active() {
            params.special.gravity_factor
        } else {
            1.0
        }
    }

    pub fn combo_multiplier(&self, params: &Params) -> f32 {
        (1.0 + self.combo as f32 * params.combo_bonus).min(params.combo_multiplier_cap)
    }

    /// Movement, jump/flight, and attack/special triggers for one tick.
    pub fn apply_input(&mut self, params: &Params, buttons: Buttons, dt: f32) -> Triggers {
        let mut t = Triggers::default();
        let pressed = rising_edges(self.buttons_was_down, buttons);
        self.buttons_was_down = buttons;

        let move_dir = buttons.contains(Buttons::RIGHT) as i32 - buttons.contains(Buttons::LEFT) as i32;
        let speed = if self.special_active() {
            params.move_speed * params.special.move_factor
        } else {
            params.move_speed
        };
        self.body.vx = move_dir as f32 * speed;
        if let Some(f) = Facing::from_velocity(move_dir as f32) {
            self.facing = f;
        }

        if pressed.contains(Buttons::JUMP) && self.body.grounded {
            self.body.vy = -params.jump_velocity;
            self.body.grounded = false;
            t.jumped = true;
        } else if let MovementMode::Flight { lift, max_rise, drain } = params.movement {
            if buttons.contains(Buttons::JUMP) && !self.power.is_empty() {
                self.body.vy = (self.body.vy - lift * dt).max(-max_rise);
                self.body.grounded = false;
                self.power.drain(drain * dt);
            }
        }

        let layered = params.special.layered;

        if pressed.contains(Buttons::ATTACK) {
            let free = self.action == ActionState::Idle && (layered || !self.special_active());
            if !free {
                trace!(target: "scrollfight_core::player", "attack ignored: busy");
            } else if self.power.spend(params.power.attack_cost) {
                self.action = ActionState::Attacking;
                self.attack_timer = params.attack_duration;
                t.attack = true;
            } else {
                trace!(target: "scrollfight_core::player", power = self.power.value(), "attack ignored: insufficient power");
            }
        }

        if pressed.contains(Buttons::SPECIAL) {
            let free = !self.special_active() && (layered || self.action == ActionState::Idle);
            if !free {
                trace!(target: "scrollfight_core::player", "special ignored: busy");
            } else if self.power.spend(params.power.special_cost) {
                self.special_timer = params.special.duration;
                t.special = true;
            } else {
                trace!(target: "scrollfight_core::player", power = self.power.value(), "special ignored: insufficient power");
            }
        }

        t
    }

    /// Countdowns and passive regeneration.
    pub fn tick_timers(&mut self, params: &Params, dt: f32) {
        if self.action == ActionState::Attacking {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                self.attack_timer = 0.0;
                self.action = ActionState::Idle;
            }
        }
        self.special_timer = (self.special_timer - dt).max(0.0);
        self.invincible_timer = (self.invincible_timer - dt).max(0.0);

        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo_timer = 0.0;
                self.combo = 0;
            }
        }

        self.power.add(params.power.regen * dt);
    }

    /// Apply incoming damage; returns what was actually taken.
    pub fn take_damage(&mut self, params: &Params, amount: f32) -> f32 {
        if !(amount > 0.0) || self.is_invincible() || !self.is_alive() {
            return 0.0;
        }
        let scaled = if self.special_active() {
            amount * params.special.damage_taken_factor
        } else {
            amount
        };
        let taken = self.health.drain(scaled);
        self.invincible_timer = params.invincible_frames;
        self.power.add(params.power.on_hurt);
        taken
    }

    /// Feedback for a successful hit: power refund and combo.
    pub fn reward_hit(&mut self, params: &Params, damage_dealt: f32) {
        self.power.add(damage_dealt * params.power.refund_per_damage);
        self.combo += 1;
        self.combo_timer = params.combo_window;
    }
}
