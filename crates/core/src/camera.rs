/// Horizontal scroll offset, eased toward the player.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// `smoothing` is the fraction of the remaining distance covered per
    /// nominal frame; larger `dt` compounds it.
    pub fn follow(
        &mut self,
        player_x: f32,
        viewport_w: f32,
        level_width: f32,
        lead: f32,
        smoothing: f32,
        dt: f32,
    ) {
        let target = player_x - viewport_w * lead;
        let k = 1.0 - (1.0 - smoothing.clamp(0.0, 1.0)).powf(dt.max(0.0));
        self.x += (target - self.x) * k;
        self.x = self.x.clamp(0.0, (level_width - viewport_w).max(0.0));
    }

    pub fn reset(&mut self) {
        self.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::Camera;

    #[test]
    fn eases_a_tenth_of_the_way_per_frame() {
        let mut cam = Camera { x: 100.0 };
        // target = 1000 - 300 = 700
        cam.follow(1000.0, 900.0, 5000.0, 1.0 / 3.0, 0.1, 1.0);
        assert!((cam.x - 160.0).abs() < 1e-3, "got {}", cam.x);
    }

    #[test]
    fn never_scrolls_past_level_edges() {
        let mut cam = Camera::default();
        cam.follow(10.0, 800.0, 3000.0, 1.0 / 3.0, 1.0, 1.0);
        assert_eq!(cam.x, 0.0);
        for _ in 0..200 {
            cam.follow(2990.0, 800.0, 3000.0, 1.0 / 3.0, 0.1, 1.0);
        }
        assert_eq!(cam.x, 2200.0);
    }

    #[test]
    fn level_narrower_than_viewport_pins_to_zero() {
        let mut cam = Camera { x: 50.0 };
        cam.follow(400.0, 800.0, 600.0, 1.0 / 3.0, 0.1, 1.0);
        assert_eq!(cam.x, 0.0);
    }
}
