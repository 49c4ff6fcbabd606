use serde::{Deserialize, Serialize};

use crate::collision::{lands_on, Rect};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that matches the sign of a velocity; `None` when at rest.
    #[inline]
    pub fn from_velocity(vx: f32) -> Option<Self> {
        if vx < 0.0 {
            Some(Facing::Left)
        } else if vx > 0.0 {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Position, velocity and extent of anything that moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub grounded: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Self::default()
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Per-level integration bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub max_fall: f32,
    pub level_width: f32,
    /// Below this `y` a body has fallen out of the world.
    pub void_y: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub landed: bool,
    pub fell_into_void: bool,
}

impl Physics {
    /// One integration step: gravity, position, one-way platform landing,
    /// horizontal clamp, then the void check.
    pub fn step<'a, I>(&self, b: &mut Body, platforms: I, gravity_scale: f32, dt: f32) -> Contact
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        let mut contact = Contact::default();
        if dt <= 0.0 {
            return contact;
        }

        let was_grounded = b.grounded;

        b.vy = (b.vy + self.gravity * gravity_scale * dt).min(self.max_fall);
        b.x += b.vx * dt;
        b.y += b.vy * dt;

        b.grounded = false;
        for p in platforms {
            if lands_on(&b.rect(), b.vy, p) {
                b.y = p.y - b.h;
                b.vy = 0.0;
                b.grounded = true;
                break;
            }
        }
        contact.landed = b.grounded && !was_grounded;

        let max_x = (self.level_width - b.w).max(0.0);
        b.x = b.x.clamp(0.0, max_x);

        contact.fell_into_void = b.y > self.void_y;
        contact
    }
}
