use serde::{Deserialize, Serialize};

/// Extra depth below a platform's top edge that still counts as landing on it.
pub const LANDING_TOLERANCE: f32 = 10.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + 0.5 * self.w, self.y + 0.5 * self.h)
    }
}

#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// One-way platform test: only a descending body whose bottom edge sits in
/// the platform's top band is caught. Bodies moving up pass through.
#[inline]
pub fn lands_on(body: &Rect, vy: f32, plat: &Rect) -> bool {
    vy > 0.0
        && rects_intersect(body, plat)
        && body.bottom() >= plat.y
        && body.bottom() <= plat.y + plat.h + LANDING_TOLERANCE
}

/// Distance between the centers of two rects.
#[inline]
pub fn center_distance(a: &Rect, b: &Rect) -> f32 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{center_distance, lands_on, rects_intersect, Rect};

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rects_intersect(&a, &b));
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(rects_intersect(&a, &c));
    }

    #[test]
    fn landing_requires_descent() {
        let plat = Rect::new(0.0, 100.0, 200.0, 20.0);
        let body = Rect::new(50.0, 52.0, 40.0, 50.0);
        assert!(lands_on(&body, 2.0, &plat));
        assert!(!lands_on(&body, -2.0, &plat));
        assert!(!lands_on(&body, 0.0, &plat));
    }

    #[test]
    fn landing_rejects_bodies_deep_below_the_top_band() {
        let plat = Rect::new(0.0, 100.0, 200.0, 20.0);
        // bottom at 135, band ends at 130
        let body = Rect::new(50.0, 85.0, 40.0, 50.0);
        assert!(rects_intersect(&body, &plat));
        assert!(!lands_on(&body, 3.0, &plat));
    }

    #[test]
    fn center_distance_is_euclidean() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(3.0, 4.0, 2.0, 2.0);
        assert!((center_distance(&a, &b) - 5.0).abs() < 1e-6);
    }
}
