//! Melee hit-windows, projectiles, and area effects fired by the player.
//!
//! [`resolve`] is called once at trigger time. Melee and immediate bursts
//! hit on that call; projectiles, rings and delayed bursts are handed to
//! [`Effects`] and resolved by [`Effects::advance`] on later ticks.

use serde::{Deserialize, Serialize};

use crate::collision::{center_distance, rects_intersect, Rect};
use crate::enemy::Enemy;
use crate::physics::{Body, Facing, Physics};
use crate::player::Player;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackVariant {
    /// Single evaluation of a box `range` px in front of the attacker.
    Melee { range: f32, damage: f32 },
    /// Travels at `speed` px/frame for `lifetime` frames; stops at the first enemy.
    Projectile {
        speed: f32,
        damage: f32,
        lifetime: f32,
        size: f32,
    },
    Area { shape: AreaShape, damage: f32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AreaShape {
    /// Expanding annulus; each enemy is hit at most once per ring.
    Ring {
        max_radius: f32,
        growth: f32,
        thickness: f32,
    },
    /// Radius check around the attacker, `delay` frames after the trigger.
    Burst { radius: f32, delay: f32 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projectile {
    pub body: Body,
    pub damage: f32,
    pub life: f32,
    pub gravity: f32,
}

impl Projectile {
    #[inline]
    pub fn hits(&self, target: &Rect) -> bool {
        rects_intersect(&self.body.rect(), target)
    }

    /// Moves the projectile; false once it expired or left the world.
    pub fn advance(&mut self, bounds: &Physics, dt: f32) -> bool {
        self.life -= dt;
        self.body.vy += self.gravity * dt;
        self.body.x += self.body.vx * dt;
        self.body.y += self.body.vy * dt;

        let r = self.body.rect();
        let outside = r.right() < 0.0
            || r.x > bounds.level_width
            || r.y > bounds.void_y
            || r.bottom() < -bounds.void_y;
        self.life > 0.0 && !outside
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub growth: f32,
    pub thickness: f32,
    pub damage: f32,
    hit: Vec<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Deferred {
    Burst {
        x: f32,
        y: f32,
        radius: f32,
        damage: f32,
    },
}

/// A tick-counted effect. Dropped with the rest of [`Effects`] on level teardown.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DelayedAction {
    pub remaining: f32,
    pub action: Deferred,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DamageEvent {
    pub enemy_id: u32,
    pub damage: f32,
    pub killed: bool,
    /// Score value of the enemy, zero unless `killed`.
    pub value: u32,
}

/// In-flight player attacks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    pub projectiles: Vec<Projectile>,
    pub rings: Vec<Ring>,
    pub delayed: Vec<DelayedAction>,
}

pub fn melee_rect(body: &Rect, facing: Facing, range: f32) -> Rect {
    let x = match facing {
        Facing::Right => body.right(),
        Facing::Left => body.x - range,
    };
    Rect::new(x, body.y, range, body.h)
}

fn hit(enemy: &mut Enemy, damage: f32) -> Option<DamageEvent> {
    if !enemy.is_alive() {
        return None;
    }
    let dealt = enemy.health.drain(damage);
    let killed = !enemy.is_alive();
    Some(DamageEvent {
        enemy_id: enemy.id,
        damage: dealt,
        killed,
        value: if killed { enemy.value() } else { 0 },
    })
}

fn burst(x: f32, y: f32, radius: f32, damage: f32, enemies: &mut [Enemy]) -> Vec<DamageEvent> {
    let origin = Rect::new(x, y, 0.0, 0.0);
    enemies
        .iter_mut()
        .filter(|e| center_distance(&origin, &e.body.rect()) <= radius)
        .filter_map(|e| hit(e, damage))
        .collect()
}

/// Fire `variant` from the attacker. `multiplier` scales area damage (combo bonus).
pub fn resolve(
    attacker: &Player,
    variant: &AttackVariant,
    multiplier: f32,
    enemies: &mut [Enemy],
    effects: &mut Effects,
) -> Vec<DamageEvent> {
    let body = attacker.body.rect();
    let (cx, cy) = body.center();

    match *variant {
        AttackVariant::Melee { range, damage } => {
            let window = melee_rect(&body, attacker.facing, range);
            enemies
                .iter_mut()
                .filter(|e| rects_intersect(&window, &e.body.rect()))
                .filter_map(|e| hit(e, damage))
                .collect()
        }
        AttackVariant::Projectile {
            speed,
            damage,
            lifetime,
            size,
        } => {
            let x = match attacker.facing {
                Facing::Right => body.right(),
                Facing::Left => body.x - size,
            };
            let mut shot = Body::new(x, cy - 0.5 * size, size, size);
            shot.vx = attacker.facing.sign() * speed;
            effects.projectiles.push(Projectile {
                body: shot,
                damage,
                life: lifetime,
                gravity: 0.0,
            });
            Vec::new()
        }
        AttackVariant::Area { shape, damage } => {
            let damage = damage * multiplier;
            match shape {
                AreaShape::Ring {
                    max_radius,
                    growth,
                    thickness,
                } => {
                    effects.rings.push(Ring {
                        x: cx,
                        y: cy,
                        radius: 0.0,
                        max_radius,
                        growth,
                        thickness,
                        damage,
                        hit: Vec::new(),
                    });
                    Vec::new()
                }
                AreaShape::Burst { radius, delay } if delay > 0.0 => {
                    effects.delayed.push(DelayedAction {
                        remaining: delay,
                        action: Deferred::Burst {
                            x: cx,
                            y: cy,
                            radius,
                            damage,
                        },
                    });
                    Vec::new()
                }
                AreaShape::Burst { radius, .. } => burst(cx, cy, radius, damage, enemies),
            }
        }
    }
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.rings.is_empty() && self.delayed.is_empty()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.rings.clear();
        self.delayed.clear();
    }

    /// Move everything in flight one tick and collect the hits.
    pub fn advance(&mut self, enemies: &mut [Enemy], bounds: &Physics, dt: f32) -> Vec<DamageEvent> {
        let mut events = Vec::new();

        self.projectiles.retain_mut(|p| {
            if !p.advance(bounds, dt) {
                return false;
            }
            let target = enemies
                .iter_mut()
                .find(|e| e.is_alive() && p.hits(&e.body.rect()));
            match target.and_then(|e| hit(e, p.damage)) {
                Some(ev) => {
                    events.push(ev);
                    false
                }
                None => true,
            }
        });

        self.rings.retain_mut(|ring| {
            ring.radius = (ring.radius + ring.growth * dt).min(ring.max_radius);
            let origin = Rect::new(ring.x, ring.y, 0.0, 0.0);
            let inner = ring.radius - ring.thickness;
            for e in enemies.iter_mut() {
                if ring.hit.contains(&e.id) {
                    continue;
                }
                let d = center_distance(&origin, &e.body.rect());
                if d <= ring.radius && d >= inner {
                    if let Some(ev) = hit(e, ring.damage) {
                        ring.hit.push(e.id);
                        events.push(ev);
                    }
                }
            }
            ring.radius < ring.max_radius
        });

        let mut fired = Vec::new();
        self.delayed.retain_mut(|d| {
            d.remaining -= dt;
            if d.remaining <= 0.0 {
                fired.push(d.action);
                false
            } else {
                true
            }
        });
        for action in fired {
            match action {
                Deferred::Burst { x, y, radius, damage } => {
                    events.extend(burst(x, y, radius, damage, enemies));
                }
            }
        }

        events
    }
}
