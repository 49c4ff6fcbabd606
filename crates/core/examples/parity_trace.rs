use serde::Serialize;

use scrollfight_core::{Buttons, Game, Phase, Skin};

#[derive(Serialize)]
struct Summary {
    skin: Skin,
    frames: u32,
    x: f32,
    y: f32,
    health: f32,
    power: f32,
    score: u64,
    phase: Phase,
    jumped: u32,
    landed: u32,
    attacks: u32,
    kills: u32,
}

fn main() {
    for skin in Skin::ALL {
        let mut game = Game::for_skin(skin, 0x5eed);
        game.start();

        let mut s = Summary {
            skin,
            frames: 0,
            x: 0.0,
            y: 0.0,
            health: 0.0,
            power: 0.0,
            score: 0,
            phase: Phase::Idle,
            jumped: 0,
            landed: 0,
            attacks: 0,
            kills: 0,
        };

        for frame in 0..900u32 {
            let mut buttons = Buttons::RIGHT;
            if frame % 60 == 10 {
                buttons |= Buttons::JUMP;
            }
            if frame % 10 == 0 {
                buttons |= Buttons::ATTACK;
            }
            if frame == 300 {
                buttons |= Buttons::SPECIAL;
            }
            game.set_buttons(buttons.bits());

            let ev = game.tick(1.0);
            s.frames += 1;
            s.jumped += ev.jumped as u32;
            s.landed += ev.landed as u32;
            s.attacks += ev.attacked as u32;
            s.kills += ev.kills;
            if game.phase() != Phase::Playing {
                break;
            }
        }

        let w = game.world();
        s.x = w.player.body.x;
        s.y = w.player.body.y;
        s.health = w.player.health.value();
        s.power = w.player.power.value();
        s.score = w.score;
        s.phase = w.phase;

        match serde_json::to_string(&s) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("{skin:?}: {e}"),
        }
    }
}
