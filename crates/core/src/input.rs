bitflags::bitflags! {
    /// Pre-debounced action flags for one tick. The bit layout is part of
    /// the host ABI (`u8` in ffi/wasm and replay tapes).
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT    = 1 << 0;
        const RIGHT   = 1 << 1;
        const JUMP    = 1 << 2;
        const ATTACK  = 1 << 3;
        const SPECIAL = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Attack,
    Special,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Attack,
        Action::Special,
    ];

    pub fn button(self) -> Buttons {
        match self {
            Action::Left => Buttons::LEFT,
            Action::Right => Buttons::RIGHT,
            Action::Jump => Buttons::JUMP,
            Action::Attack => Buttons::ATTACK,
            Action::Special => Buttons::SPECIAL,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

/// Caller-owned held-key state, fed to the simulation once per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    held: Buttons,
}

impl InputState {
    pub fn set_key(&mut self, action: Action, pressed: bool) {
        self.held.set(action.button(), pressed);
    }

    pub fn set_bits(&mut self, bits: u8) {
        self.held = Buttons::from_bits_truncate(bits);
    }

    pub fn buttons(&self) -> Buttons {
        self.held
    }

    pub fn clear(&mut self) {
        self.held = Buttons::empty();
    }
}

/// Buttons that went down this tick.
#[inline]
pub fn rising_edges(was_down: Buttons, now: Buttons) -> Buttons {
    now & !was_down
}
