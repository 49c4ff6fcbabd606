//! Enemy archetypes and their patrol/aggro/windup behavior.
//!
//! Enemies only move horizontally inside their patrol interval; they never
//! jump or path around platforms.

use serde::{Deserialize, Serialize};

use crate::attack::Projectile;
use crate::collision::{rects_intersect, Rect};
use crate::meter::Meter;
use crate::physics::{Body, Facing};

const ENEMY_SHOT_SIZE: f32 = 8.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Light,
    Medium,
    Heavy,
    Ranged,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArchetypeStats {
    pub health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub value: u32,
    pub w: f32,
    pub h: f32,
    pub ranged: bool,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Light,
        Archetype::Medium,
        Archetype::Heavy,
        Archetype::Ranged,
    ];

    pub const fn stats(self) -> ArchetypeStats {
        match self {
            Archetype::Light => ArchetypeStats {
                health: 2.0,
                speed: 1.6,
                contact_damage: 10.0,
                value: 100,
                w: 30.0,
                h: 40.0,
                ranged: false,
            },
            Archetype::Medium => ArchetypeStats {
                health: 4.0,
                speed: 1.0,
                contact_damage: 15.0,
                value: 200,
                w: 40.0,
                h: 50.0,
                ranged: false,
            },
            Archetype::Heavy => ArchetypeStats {
                health: 8.0,
                speed: 0.6,
                contact_damage: 25.0,
                value: 400,
                w: 56.0,
                h: 64.0,
                ranged: false,
            },
            Archetype::Ranged => ArchetypeStats {
                health: 3.0,
                speed: 0.8,
                contact_damage: 10.0,
                value: 250,
                w: 36.0,
                h: 50.0,
                ranged: true,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AimMode {
    /// Straight line at the target's current center.
    #[default]
    Straight,
    /// Lobbed shot; launch velocity compensates for `gravity`.
    Ballistic { gravity: f32 },
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum AiState {
    #[default]
    Patrol,
    Aggro,
    Windup { remaining: f32 },
}

/// Per-level AI tuning shared by every enemy on the level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EnemyTuning {
    pub aggro_range: f32,
    pub windup: f32,
    pub attack_interval: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime: f32,
    pub aim: AimMode,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub archetype: Archetype,
    pub body: Body,
    pub health: Meter,
    pub facing: Facing,
    pub patrol_left: f32,
    pub patrol_right: f32,
    pub attack_timer: Option<f32>,
    pub state: AiState,
}

impl Enemy {
    /// Spawn standing on `ground_y`, walking right. `patrol` bounds the
    /// enemy's left edge.
    pub fn spawn(
        id: u32,
        archetype: Archetype,
        x: f32,
        ground_y: f32,
        patrol: (f32, f32),
        health_bonus: f32,
        attack_interval: Option<f32>,
    ) -> Self {
        let stats = archetype.stats();
        let mut body = Body::new(x, ground_y - stats.h, stats.w, stats.h);
        body.vx = stats.speed;
        body.grounded = true;
        let (patrol_left, patrol_right) = (patrol.0.min(patrol.1), patrol.0.max(patrol.1));
        Self {
            id,
            archetype,
            body,
            health: Meter::full(stats.health + health_bonus.max(0.0)),
            facing: Facing::Right,
            patrol_left,
            patrol_right,
            attack_timer: if stats.ranged { attack_interval } else { None },
            state: AiState::Patrol,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn value(&self) -> u32 {
        self.archetype.stats().value
    }

    pub fn contact_damage(&self) -> f32 {
        self.archetype.stats().contact_damage
    }

    pub fn touches(&self, target: &Rect) -> bool {
        rects_intersect(&self.body.rect(), target)
    }

    /// Advance one tick. Returns a projectile when a ranged enemy fires.
    pub fn update(&mut self, target: &Rect, tuning: &EnemyTuning, dt: f32) -> Option<Projectile> {
        let stats = self.archetype.stats();
        let (tx, _) = target.center();
        let (ex, _) = self.body.rect().center();
        let dx = tx - ex;
        let mut shot = None;

        match self.state {
            AiState::Windup { remaining } => {
                self.body.vx = 0.0;
                self.face_toward(dx);
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    shot = Some(self.fire(target, tuning));
                    self.attack_timer = Some(tuning.attack_interval);
                    self.state = AiState::Patrol;
                    self.body.vx = self.facing.sign() * stats.speed;
                } else {
                    self.state = AiState::Windup { remaining };
                }
            }
            AiState::Patrol | AiState::Aggro => {
                if let Some(timer) = self.attack_timer.as_mut() {
                    *timer -= dt;
                    if *timer <= 0.0 {
                        *timer = 0.0;
                        self.state = AiState::Windup {
                            remaining: tuning.windup,
                        };
                        self.body.vx = 0.0;
                        self.face_toward(dx);
                        return None;
                    }
                }

                if !stats.ranged && dx.abs() <= tuning.aggro_range {
                    self.state = AiState::Aggro;
                    self.body.vx = if dx.abs() < 1.0 { 0.0 } else { dx.signum() * stats.speed };
                    self.face_toward(dx);
                } else {
                    self.state = AiState::Patrol;
                    if self.body.vx == 0.0 {
                        self.body.vx = self.facing.sign() * stats.speed;
                    }
                }
            }
        }

        self.body.x += self.body.vx * dt;
        let patrolling = self.state == AiState::Patrol;
        if self.body.x <= self.patrol_left {
            self.body.x = self.patrol_left;
            self.body.vx = if patrolling { stats.speed } else { 0.0 };
        } else if self.body.x >= self.patrol_right {
            self.body.x = self.patrol_right;
            self.body.vx = if patrolling { -stats.speed } else { 0.0 };
        }
        if let Some(f) = Facing::from_velocity(self.body.vx) {
            self.facing = f;
        }

        shot
    }

    fn face_toward(&mut self, dx: f32) {
        if let Some(f) = Facing::from_velocity(dx) {
            self.facing = f;
        }
    }

    fn fire(&self, target: &Rect, tuning: &EnemyTuning) -> Projectile {
        let (ex, ey) = self.body.rect().center();
        let (tx, ty) = target.center();
        let (dx, dy) = (tx - ex, ty - ey);
        let speed = tuning.projectile_speed.max(f32::EPSILON);

        let (vx, vy, gravity) = match tuning.aim {
            AimMode::Straight => {
                let len = (dx * dx + dy * dy).sqrt();
                if len < 1e-3 {
                    (self.facing.sign() * speed, 0.0, 0.0)
                } else {
                    (dx / len * speed, dy / len * speed, 0.0)
                }
            }
            AimMode::Ballistic { gravity } => {
                let t = (dx.abs() / speed).max(1.0);
                (dx / t, dy / t - 0.5 * gravity * t, gravity)
            }
        };

        let half = 0.5 * ENEMY_SHOT_SIZE;
        let mut body = Body::new(ex - half, ey - half, ENEMY_SHOT_SIZE, ENEMY_SHOT_SIZE);
        body.vx = vx;
        body.vy = vy;
        Projectile {
            body,
            damage: tuning.projectile_damage,
            life: tuning.projectile_lifetime,
            gravity,
        }
    }
}
