use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

use scrollfight_core::{Action, Events, FrameClock, Game, Params, Skin, World};

#[wasm_bindgen]
pub struct Core {
    game: Game,
    clock: FrameClock,
    skin: Skin,
    seed: u32,
}

fn set(obj: &Object, key: &str, val: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &val);
}

fn state_object(world: &World, ev: &Events) -> JsValue {
    let s = world.snapshot();
    let p = &world.player;
    let obj = Object::new();
    set(&obj, "score", JsValue::from_f64(s.score as f64));
    set(&obj, "health", JsValue::from_f64(s.health as f64));
    set(&obj, "maxHealth", JsValue::from_f64(s.max_health as f64));
    set(&obj, "power", JsValue::from_f64(s.power as f64));
    set(&obj, "maxPower", JsValue::from_f64(s.max_power as f64));
    set(&obj, "level", JsValue::from_f64(s.level as f64));
    set(&obj, "phase", JsValue::from_str(s.phase.as_str()));
    set(&obj, "combo", JsValue::from_f64(s.combo as f64));
    set(&obj, "cameraX", JsValue::from_f64(s.camera_x as f64));

    set(&obj, "x", JsValue::from_f64(p.body.x as f64));
    set(&obj, "y", JsValue::from_f64(p.body.y as f64));
    set(&obj, "facing", JsValue::from_f64(p.facing.sign() as f64));
    set(&obj, "attacking", JsValue::from_bool(p.is_attacking()));
    set(&obj, "special", JsValue::from_bool(p.special_active()));
    set(&obj, "invincible", JsValue::from_bool(p.is_invincible()));

    set(&obj, "jumped", JsValue::from_bool(ev.jumped != 0));
    set(&obj, "landed", JsValue::from_bool(ev.landed != 0));
    set(&obj, "hits", JsValue::from_f64(ev.hits as f64));
    set(&obj, "kills", JsValue::from_f64(ev.kills as f64));
    set(&obj, "damageTaken", JsValue::from_f64(ev.damage_taken as f64));
    JsValue::from(obj)
}

#[wasm_bindgen]
impl Core {
    /// `skin` is 0..=4 (sonic, vampire, dragon, cyclops, cerberus).
    #[wasm_bindgen(constructor)]
    pub fn new(skin: u8, seed: u32) -> Result<Core, JsValue> {
        let skin = Skin::from_id(skin).ok_or_else(|| JsValue::from_str("unknown skin id"))?;
        Ok(Core {
            game: Game::for_skin(skin, seed as u64),
            clock: FrameClock::new(),
            skin,
            seed,
        })
    }

    #[wasm_bindgen(js_name = resourceName)]
    pub fn resource_name(&self) -> String {
        self.skin.resource_name().to_string()
    }

    /// Replace the skin preset with a (partial) params document. Resets the game.
    #[wasm_bindgen(js_name = setParamsJson)]
    pub fn set_params_json(&mut self, json: &str) -> Result<(), JsValue> {
        let params = Params::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.game = Game::new(params, self.seed as u64).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    pub fn start(&mut self) {
        self.clock.reset();
        self.game.start();
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) -> Result<String, JsValue> {
        self.clock.reset();
        self.game
            .next_level()
            .map(|phase| phase.as_str().to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `action`: 0 left, 1 right, 2 jump, 3 attack, 4 special.
    #[wasm_bindgen(js_name = setKey)]
    pub fn set_key(&mut self, action: u8, pressed: bool) {
        if let Some(action) = Action::from_id(action) {
            self.game.set_key(action, pressed);
        }
    }

    /// Call from `requestAnimationFrame` with its timestamp.
    pub fn frame(&mut self, now_ms: f64) -> JsValue {
        let dt = self.clock.advance(now_ms);
        let ev = self.game.tick(dt);
        state_object(self.game.world(), &ev)
    }

    /// Step with an explicit frame multiplier.
    pub fn tick(&mut self, dt: f32) -> JsValue {
        let ev = self.game.tick(dt);
        state_object(self.game.world(), &ev)
    }

    /// Forget the last frame timestamp (after a pause or hidden tab).
    pub fn resume(&mut self) {
        self.clock.reset();
    }

    /// Packed rects: [x,y,w,h, x,y,w,h, ...], ground first.
    pub fn platforms(&self) -> Box<[f32]> {
        self.game
            .world()
            .level
            .surfaces()
            .flat_map(|r| [r.x, r.y, r.w, r.h])
            .collect()
    }

    /// Packed: [x,y,w,h,archetype,facing,healthFraction, ...].
    pub fn enemies(&self) -> Box<[f32]> {
        self.game
            .world()
            .enemies
            .iter()
            .flat_map(|e| {
                [
                    e.body.x,
                    e.body.y,
                    e.body.w,
                    e.body.h,
                    e.archetype as u8 as f32,
                    e.facing.sign(),
                    e.health.fraction(),
                ]
            })
            .collect()
    }

    /// Packed: [x,y,w,h,hostile, ...]; hostile is 1 for enemy shots.
    pub fn projectiles(&self) -> Box<[f32]> {
        let w = self.game.world();
        let friendly = w.effects.projectiles.iter().map(|p| (p, 0.0));
        let hostile = w.enemy_projectiles.iter().map(|p| (p, 1.0));
        friendly
            .chain(hostile)
            .flat_map(|(p, flag)| [p.body.x, p.body.y, p.body.w, p.body.h, flag])
            .collect()
    }

    /// Packed: [x,y,radius, ...] for expanding rings.
    pub fn rings(&self) -> Box<[f32]> {
        self.game
            .world()
            .effects
            .rings
            .iter()
            .flat_map(|r| [r.x, r.y, r.radius])
            .collect()
    }

    #[wasm_bindgen(js_name = levelWidth)]
    pub fn level_width(&self) -> f32 {
        self.game.world().level.width
    }
}
