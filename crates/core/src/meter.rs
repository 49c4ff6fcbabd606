/// A bounded gauge. Player health, the power resource and enemy health are
/// all meters; the value can never leave `[0, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Meter {
    value: f32,
    max: f32,
}

impl Meter {
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { value: max, max }
    }

    pub fn with_value(value: f32, max: f32) -> Self {
        let mut m = Self::full(max);
        m.set(value);
        m
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.value / self.max
        }
    }

    pub fn set(&mut self, value: f32) {
        self.value = if value.is_nan() { 0.0 } else { value.clamp(0.0, self.max) };
    }

    /// Returns how much was actually added.
    pub fn add(&mut self, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let before = self.value;
        self.set(before + amount);
        self.value - before
    }

    /// Returns how much was actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let before = self.value;
        self.set(before - amount);
        before - self.value
    }

    /// All-or-nothing: spends `cost` only when the meter holds at least that much.
    pub fn spend(&mut self, cost: f32) -> bool {
        if self.value < cost {
            return false;
        }
        self.drain(cost);
        true
    }

    pub fn empty(&mut self) {
        self.value = 0.0;
    }
}
