use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{info, warn};

use scrollfight_core::logging::init_tracing_default;
use scrollfight_core::{Buttons, Params, Phase, Skin, World};

/// Input tape. Only `inputs` is required.
///
/// ```json
/// { "skin": "dragon_rider", "seed": 42, "inputs": [2, 2, 6, 10], "dt": [1.0, 1.0, 2.0, 1.0] }
/// ```
#[derive(Debug, Deserialize)]
struct Tape {
    #[serde(default)]
    skin: Option<Skin>,
    /// Raw params; when present they replace the skin preset entirely.
    #[serde(default)]
    params: Option<serde_json::Value>,
    #[serde(default)]
    seed: u64,
    inputs: Vec<u8>,
    /// Per-frame multipliers; missing entries are one nominal frame.
    #[serde(default)]
    dt: Vec<f32>,
    /// Call `next_level` automatically whenever a level is cleared.
    #[serde(default)]
    auto_advance: bool,
}

fn load_params(tape: &Tape) -> Result<Params, Box<dyn std::error::Error>> {
    match (&tape.params, tape.skin) {
        (Some(raw), _) => Ok(Params::from_json(&raw.to_string())?),
        (None, Some(skin)) => Ok(Params::for_skin(skin)),
        (None, None) => Ok(Params::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing_default();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: cargo run -p scrollfight_core --bin replay -- <tape.json>")?;
    let raw = fs::read_to_string(&path)?;
    let tape: Tape = serde_json::from_str(&raw)?;
    let params = load_params(&tape)?;

    info!(path = %path.display(), frames = tape.inputs.len(), seed = tape.seed, "replaying tape");

    let mut world = World::new(params, tape.seed);
    world.start();

    println!("frame,x,y,vx,vy,grounded,health,power,score,enemies,level,phase");
    for (frame, bits) in tape.inputs.iter().enumerate() {
        let dt = tape.dt.get(frame).copied().unwrap_or(1.0);
        let buttons = Buttons::from_bits_truncate(*bits);
        let _ = world.step(buttons, dt);

        let p = &world.player;
        println!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            frame,
            p.body.x,
            p.body.y,
            p.body.vx,
            p.body.vy,
            p.body.grounded as u8,
            p.health.value(),
            p.power.value(),
            world.score,
            world.enemies.len(),
            world.level.number,
            world.phase.as_str(),
        );

        match world.phase {
            Phase::Clear if tape.auto_advance => {
                world.next_level()?;
            }
            Phase::Over | Phase::Complete => {
                warn!(frame, phase = world.phase.as_str(), "session ended before the tape did");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
