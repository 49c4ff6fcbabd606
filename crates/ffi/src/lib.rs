use std::ffi::{c_char, CStr};

use scrollfight_core::logging::init_tracing;
use scrollfight_core::{Action, CoreError, Events, Game, Params, Phase, Skin};

pub const CORE_OK: i32 = 0;
pub const CORE_ERR_NULL: i32 = -1;
pub const CORE_ERR_UTF8: i32 = -2;
pub const CORE_ERR_PARAMS: i32 = -3;
pub const CORE_ERR_TRANSITION: i32 = -4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct CoreSnapshot {
    pub score: u64,
    pub health: f32,
    pub max_health: f32,
    pub power: f32,
    pub max_power: f32,
    pub level: u32,
    pub phase: u8,
    pub combo: u32,
    pub camera_x: f32,
}

/// Optional: route core logs to stderr. `filter` may be null for the default.
#[no_mangle]
pub extern "C" fn core_init_logging(filter: *const c_char) {
    if filter.is_null() {
        scrollfight_core::logging::init_tracing_default();
        return;
    }
    let filter = unsafe { CStr::from_ptr(filter) };
    init_tracing(&filter.to_string_lossy());
}

/// New game for one of the built-in skins (0..=4). Null on an unknown id.
#[no_mangle]
pub extern "C" fn core_new(skin: u8, seed: u64) -> *mut Game {
    match Skin::from_id(skin) {
        Some(skin) => Box::into_raw(Box::new(Game::for_skin(skin, seed))),
        None => std::ptr::null_mut(),
    }
}

/// New game from a params JSON document. Writes a status code to `status`.
#[no_mangle]
pub extern "C" fn core_new_with_params(json: *const c_char, seed: u64, status: *mut i32) -> *mut Game {
    let set = |code: i32| {
        if !status.is_null() {
            unsafe { *status = code };
        }
    };
    if json.is_null() {
        set(CORE_ERR_NULL);
        return std::ptr::null_mut();
    }
    let Ok(json) = unsafe { CStr::from_ptr(json) }.to_str() else {
        set(CORE_ERR_UTF8);
        return std::ptr::null_mut();
    };
    match Params::from_json(json).map_err(CoreError::from).and_then(|p| Game::new(p, seed)) {
        Ok(game) => {
            set(CORE_OK);
            Box::into_raw(Box::new(game))
        }
        Err(_) => {
            set(CORE_ERR_PARAMS);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn core_free(game: *mut Game) {
    if !game.is_null() {
        drop(unsafe { Box::from_raw(game) });
    }
}

#[no_mangle]
pub extern "C" fn core_start(game: *mut Game) {
    if let Some(g) = unsafe { game.as_mut() } {
        g.start();
    }
}

/// Returns the new phase id, or a negative status code.
#[no_mangle]
pub extern "C" fn core_next_level(game: *mut Game) -> i32 {
    let Some(g) = (unsafe { game.as_mut() }) else {
        return CORE_ERR_NULL;
    };
    match g.next_level() {
        Ok(phase) => phase.id() as i32,
        Err(_) => CORE_ERR_TRANSITION,
    }
}

#[no_mangle]
pub extern "C" fn core_set_key(game: *mut Game, action: u8, pressed: u8) {
    let (Some(g), Some(action)) = (unsafe { game.as_mut() }, Action::from_id(action)) else {
        return;
    };
    g.set_key(action, pressed != 0);
}

#[no_mangle]
pub extern "C" fn core_set_buttons(game: *mut Game, input_bits: u8) {
    if let Some(g) = unsafe { game.as_mut() } {
        g.set_buttons(input_bits);
    }
}

#[no_mangle]
pub extern "C" fn core_tick(game: *mut Game, dt: f32) -> Events {
    match unsafe { game.as_mut() } {
        Some(g) => g.tick(dt),
        None => Events::default(),
    }
}

#[no_mangle]
pub extern "C" fn core_snapshot(game: *const Game, out: *mut CoreSnapshot) -> i32 {
    let Some(g) = (unsafe { game.as_ref() }) else {
        return CORE_ERR_NULL;
    };
    if out.is_null() {
        return CORE_ERR_NULL;
    }
    let s = g.snapshot();
    unsafe {
        *out = CoreSnapshot {
            score: s.score,
            health: s.health,
            max_health: s.max_health,
            power: s.power,
            max_power: s.max_power,
            level: s.level,
            phase: s.phase.id(),
            combo: s.combo,
            camera_x: s.camera_x,
        };
    }
    CORE_OK
}

/// Phase id of a game, `Phase::Idle` for null.
#[no_mangle]
pub extern "C" fn core_phase(game: *const Game) -> u8 {
    unsafe { game.as_ref() }.map_or(Phase::Idle, Game::phase).id()
}
