#![allow(clippy::many_single_char_names)]

//! Side-scrolling action-combat simulation core.
//!
//! Hosts own the frame loop: feed held buttons and a frame multiplier into
//! [`Game::tick`] (or [`World::step`]) once per rendered frame and draw from
//! the read-only [`World`]. Everything inside a tick is deterministic for a
//! given seed, parameter set and input sequence.

pub mod attack;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod error;
pub mod game;
pub mod input;
pub mod level;
pub mod logging;
pub mod meter;
pub mod params;
pub mod physics;
pub mod player;

pub use attack::{AreaShape, AttackVariant};
pub use clock::{clamp_dt, FrameClock, FRAME_MS, HZ, MAX_DT};
pub use collision::{rects_intersect, Rect};
pub use enemy::{AimMode, Archetype};
pub use error::{ConfigError, CoreError};
pub use game::{Events, Game, Phase, Snapshot, World};
pub use input::{Action, Buttons, InputState};
pub use params::{MovementMode, Params, Skin};
