//! Wall-clock frame callbacks to a bounded simulation delta.
//!
//! The simulation runs in nominal 60 Hz frames. A `dt` of `1.0` is one
//! nominal frame; hosts that tick slower (or resume from a hidden tab) get
//! a larger multiplier, capped at [`MAX_DT`] so fast bodies cannot tunnel
//! through platforms.

pub const HZ: f32 = 60.0;
pub const FRAME_MS: f64 = 1000.0 / HZ as f64;
pub const MAX_DT: f32 = 2.0;

/// Clamp an arbitrary host delta into `[0, MAX_DT]`. NaN becomes zero.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_DT)
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the host timestamp (milliseconds) of the current frame callback
    /// and get the frame multiplier to simulate. The first call after
    /// construction or [`reset`](Self::reset) yields exactly one frame.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            None => 1.0,
            Some(last) => clamp_dt(((now_ms - last) / FRAME_MS) as f32),
        };
        self.last_ms = Some(now_ms);
        dt
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
