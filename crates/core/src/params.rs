//! Tunables. One `Params` value fully describes a game skin; the five
//! shipped skins differ only in numbers and attack variants.

use serde::{Deserialize, Serialize};

use crate::attack::{AreaShape, AttackVariant};
use crate::clock::MAX_DT;
use crate::enemy::AimMode;
use crate::error::ConfigError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MovementMode {
    /// Edge-triggered jump while grounded.
    #[default]
    Jump,
    /// Grounded jump plus level-triggered lift while the jump key is held
    /// and power remains. `drain` is power per frame of lift.
    Flight { lift: f32, max_rise: f32, drain: f32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerParams {
    pub max: f32,
    pub start: f32,
    /// Passive regeneration per frame.
    pub regen: f32,
    pub attack_cost: f32,
    pub special_cost: f32,
    /// Flat grant when the player gets hurt.
    pub on_hurt: f32,
    /// Power returned per point of damage the player deals.
    pub refund_per_damage: f32,
}

impl Default for PowerParams {
    fn default() -> Self {
        Self {
            max: 100.0,
            start: 50.0,
            regen: 0.1,
            attack_cost: 5.0,
            special_cost: 40.0,
            on_hurt: 5.0,
            refund_per_damage: 2.5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialParams {
    pub variant: AttackVariant,
    pub duration: f32,
    pub move_factor: f32,
    /// Multiplier on incoming damage while active (0.5 halves it).
    pub damage_taken_factor: f32,
    pub gravity_factor: f32,
    /// When set the special is a modifier on top of the base state and
    /// basic attacks stay available while it runs.
    pub layered: bool,
}

impl Default for SpecialParams {
    fn default() -> Self {
        Self {
            variant: AttackVariant::Area {
                shape: AreaShape::Ring {
                    max_radius: 250.0,
                    growth: 12.0,
                    thickness: 40.0,
                },
                damage: 3.0,
            },
            duration: 60.0,
            move_factor: 1.0,
            damage_taken_factor: 1.0,
            gravity_factor: 1.0,
            layered: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub base_width: f32,
    pub width_per_level: f32,
    pub platform_count: u32,
    pub enemy_base_count: u32,
    pub enemy_count_step: u32,
    pub enemy_health_per_level: f32,
    pub ranged_interval: f32,
    pub ranged_interval_step: f32,
    pub ranged_interval_min: f32,
    /// Fraction of max health restored by `next_level`.
    pub heal_fraction: f32,
    /// Last playable level; `None` plays forever.
    pub max_levels: Option<u32>,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            base_width: 3000.0,
            width_per_level: 500.0,
            platform_count: 4,
            enemy_base_count: 3,
            enemy_count_step: 2,
            enemy_health_per_level: 1.0,
            ranged_interval: 150.0,
            ranged_interval_step: 10.0,
            ranged_interval_min: 60.0,
            heal_fraction: 0.3,
            max_levels: Some(10),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyParams {
    pub aggro_range: f32,
    pub windup: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime: f32,
    pub aim: AimMode,
}

impl Default for EnemyParams {
    fn default() -> Self {
        Self {
            aggro_range: 160.0,
            windup: 20.0,
            projectile_speed: 5.0,
            projectile_damage: 8.0,
            projectile_lifetime: 180.0,
            aim: AimMode::Straight,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub viewport_w: f32,
    pub viewport_h: f32,
    pub ground_height: f32,

    pub gravity: f32,
    pub max_fall: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub movement: MovementMode,

    pub player_w: f32,
    pub player_h: f32,
    pub max_health: f32,
    /// Grace frames after taking damage.
    pub invincible_frames: f32,

    pub power: PowerParams,
    pub attack: AttackVariant,
    pub attack_duration: f32,
    pub special: SpecialParams,

    pub combo_window: f32,
    pub combo_bonus: f32,
    pub combo_multiplier_cap: f32,

    pub camera_smoothing: f32,
    /// Player sits this fraction of the viewport from the left edge.
    pub camera_lead: f32,

    pub level: LevelParams,
    pub enemy: EnemyParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            viewport_w: 800.0,
            viewport_h: 600.0,
            ground_height: 40.0,

            gravity: 0.5,
            max_fall: 15.0,
            move_speed: 5.0,
            jump_velocity: 12.0,
            movement: MovementMode::Jump,

            player_w: 40.0,
            player_h: 50.0,
            max_health: 100.0,
            invincible_frames: 60.0,

            power: PowerParams::default(),
            attack: AttackVariant::Melee {
                range: 50.0,
                damage: 2.0,
            },
            attack_duration: 15.0,
            special: SpecialParams::default(),

            combo_window: 90.0,
            combo_bonus: 0.1,
            combo_multiplier_cap: 2.0,

            camera_smoothing: 0.1,
            camera_lead: 1.0 / 3.0,

            level: LevelParams::default(),
            enemy: EnemyParams::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skin {
    SonicFighter,
    VampireHunter,
    DragonRider,
    CyclopsHunter,
    CerberusTamer,
}

impl Skin {
    pub const ALL: [Skin; 5] = [
        Skin::SonicFighter,
        Skin::VampireHunter,
        Skin::DragonRider,
        Skin::CyclopsHunter,
        Skin::CerberusTamer,
    ];

    /// Label of the power resource for the UI.
    pub fn resource_name(self) -> &'static str {
        match self {
            Skin::SonicFighter => "sonic",
            Skin::VampireHunter => "blood",
            Skin::DragonRider => "energy",
            Skin::CyclopsHunter => "focus",
            Skin::CerberusTamer => "souls",
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

impl Params {
    pub fn for_skin(skin: Skin) -> Self {
        let base = Self::default();
        match skin {
            // Sonic waves, resonance field halves incoming damage.
            Skin::SonicFighter => Self {
                attack: AttackVariant::Projectile {
                    speed: 10.0,
                    damage: 1.0,
                    lifetime: 60.0,
                    size: 12.0,
                },
                special: SpecialParams {
                    duration: 300.0,
                    damage_taken_factor: 0.5,
                    layered: true,
                    ..SpecialParams::default()
                },
                ..base
            },
            // Whip strikes, bat form floats and slows.
            Skin::VampireHunter => Self {
                attack: AttackVariant::Melee {
                    range: 60.0,
                    damage: 2.0,
                },
                special: SpecialParams {
                    variant: AttackVariant::Area {
                        shape: AreaShape::Burst {
                            radius: 150.0,
                            delay: 0.0,
                        },
                        damage: 3.0,
                    },
                    duration: 240.0,
                    move_factor: 0.8,
                    gravity_factor: 0.35,
                    layered: true,
                    ..SpecialParams::default()
                },
                ..base
            },
            // Flies on energy, meteor lands after a short delay.
            Skin::DragonRider => Self {
                movement: MovementMode::Flight {
                    lift: 0.9,
                    max_rise: 6.0,
                    drain: 0.25,
                },
                attack: AttackVariant::Projectile {
                    speed: 8.0,
                    damage: 2.0,
                    lifetime: 90.0,
                    size: 16.0,
                },
                special: SpecialParams {
                    variant: AttackVariant::Area {
                        shape: AreaShape::Burst {
                            radius: 180.0,
                            delay: 30.0,
                        },
                        damage: 5.0,
                    },
                    duration: 30.0,
                    ..SpecialParams::default()
                },
                enemy: EnemyParams {
                    aim: AimMode::Ballistic { gravity: 0.2 },
                    ..EnemyParams::default()
                },
                ..base
            },
            // Fast eye beam, focused blast around the hunter.
            Skin::CyclopsHunter => Self {
                attack: AttackVariant::Projectile {
                    speed: 14.0,
                    damage: 1.0,
                    lifetime: 45.0,
                    size: 8.0,
                },
                power: PowerParams {
                    attack_cost: 3.0,
                    special_cost: 60.0,
                    ..PowerParams::default()
                },
                special: SpecialParams {
                    variant: AttackVariant::Area {
                        shape: AreaShape::Burst {
                            radius: 220.0,
                            delay: 0.0,
                        },
                        damage: 4.0,
                    },
                    duration: 45.0,
                    ..SpecialParams::default()
                },
                ..base
            },
            // Three-headed bite, soul ring scales hard with combo.
            Skin::CerberusTamer => Self {
                attack: AttackVariant::Melee {
                    range: 45.0,
                    damage: 3.0,
                },
                attack_duration: 20.0,
                combo_bonus: 0.25,
                combo_multiplier_cap: 3.0,
                special: SpecialParams {
                    variant: AttackVariant::Area {
                        shape: AreaShape::Ring {
                            max_radius: 300.0,
                            growth: 15.0,
                            thickness: 50.0,
                        },
                        damage: 2.0,
                    },
                    duration: 60.0,
                    ..SpecialParams::default()
                },
                ..base
            },
        }
    }

    /// Parse a (possibly partial) JSON object; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be > 0, got {v}")))
            }
        }
        fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be >= 0, got {v}")))
            }
        }

        positive("viewport_w", self.viewport_w)?;
        positive("viewport_h", self.viewport_h)?;
        positive("ground_height", self.ground_height)?;
        non_negative("gravity", self.gravity)?;
        positive("max_fall", self.max_fall)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("jump_velocity", self.jump_velocity)?;
        positive("player_w", self.player_w)?;
        positive("player_h", self.player_h)?;
        positive("max_health", self.max_health)?;
        non_negative("invincible_frames", self.invincible_frames)?;

        positive("power.max", self.power.max)?;
        non_negative("power.start", self.power.start)?;
        non_negative("power.regen", self.power.regen)?;
        non_negative("power.attack_cost", self.power.attack_cost)?;
        non_negative("power.special_cost", self.power.special_cost)?;
        non_negative("power.on_hurt", self.power.on_hurt)?;
        non_negative("power.refund_per_damage", self.power.refund_per_damage)?;

        validate_variant("attack", &self.attack)?;
        validate_variant("special.variant", &self.special.variant)?;
        positive("attack_duration", self.attack_duration)?;
        positive("special.duration", self.special.duration)?;
        non_negative("special.move_factor", self.special.move_factor)?;
        non_negative("special.damage_taken_factor", self.special.damage_taken_factor)?;
        non_negative("special.gravity_factor", self.special.gravity_factor)?;

        if let MovementMode::Flight { lift, max_rise, drain } = self.movement {
            positive("movement.lift", lift)?;
            positive("movement.max_rise", max_rise)?;
            non_negative("movement.drain", drain)?;
        }

        non_negative("combo_window", self.combo_window)?;
        non_negative("combo_bonus", self.combo_bonus)?;
        if !(self.combo_multiplier_cap >= 1.0) {
            return Err(ConfigError::invalid("combo_multiplier_cap", "must be >= 1".to_string()));
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(ConfigError::invalid("camera_smoothing", "must be in (0, 1]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.camera_lead) {
            return Err(ConfigError::invalid("camera_lead", "must be in [0, 1]".to_string()));
        }

        if !(self.level.base_width >= self.viewport_w) {
            return Err(ConfigError::invalid(
                "level.base_width",
                "must be at least the viewport width".to_string(),
            ));
        }
        non_negative("level.width_per_level", self.level.width_per_level)?;
        non_negative("level.enemy_health_per_level", self.level.enemy_health_per_level)?;
        positive("level.ranged_interval_min", self.level.ranged_interval_min)?;
        non_negative("level.ranged_interval_step", self.level.ranged_interval_step)?;
        if !(self.level.ranged_interval >= self.level.ranged_interval_min) {
            return Err(ConfigError::invalid(
                "level.ranged_interval",
                "must be >= ranged_interval_min".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.level.heal_fraction) {
            return Err(ConfigError::invalid("level.heal_fraction", "must be in [0, 1]".to_string()));
        }
        if self.level.max_levels == Some(0) {
            return Err(ConfigError::invalid("level.max_levels", "must be >= 1".to_string()));
        }

        non_negative("enemy.aggro_range", self.enemy.aggro_range)?;
        non_negative("enemy.windup", self.enemy.windup)?;
        positive("enemy.projectile_speed", self.enemy.projectile_speed)?;
        non_negative("enemy.projectile_damage", self.enemy.projectile_damage)?;
        positive("enemy.projectile_lifetime", self.enemy.projectile_lifetime)?;
        Ok(())
    }
}

fn validate_variant(field: &'static str, variant: &AttackVariant) -> Result<(), ConfigError> {
    let ok = match *variant {
        AttackVariant::Melee { range, damage } => range > 0.0 && damage >= 0.0,
        AttackVariant::Projectile {
            speed,
            damage,
            lifetime,
            size,
        } => speed > 0.0 && damage >= 0.0 && lifetime > 0.0 && size > 0.0,
        AttackVariant::Area { shape, damage } => {
            damage >= 0.0
                && match shape {
                    AreaShape::Ring {
                        max_radius,
                        growth,
                        thickness,
                    } => max_radius > 0.0 && growth > 0.0 && thickness >= growth * MAX_DT,
                    AreaShape::Burst { radius, delay } => radius > 0.0 && delay >= 0.0,
                }
        }
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("invalid attack variant {variant:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{MovementMode, Params, Skin};
    use crate::attack::AttackVariant;
    use crate::error::ConfigError;

    #[test]
    fn defaults_and_skins_validate() {
        Params::default().validate().unwrap();
        for skin in Skin::ALL {
            Params::for_skin(skin)
                .validate()
                .unwrap_or_else(|e| panic!("{skin:?}: {e}"));
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p = Params::from_json(r#"{ "gravity": 0.8, "power": { "regen": 0.5 } }"#).unwrap();
        assert_eq!(p.gravity, 0.8);
        assert_eq!(p.power.regen, 0.5);
        assert_eq!(p.power.max, 100.0);
        assert_eq!(p.move_speed, Params::default().move_speed);
    }

    #[test]
    fn tagged_variants_parse() {
        let p = Params::from_json(
            r#"{
                "movement": { "mode": "flight", "lift": 1.0, "max_rise": 5.0, "drain": 0.2 },
                "attack": { "kind": "projectile", "speed": 9.0, "damage": 1.0, "lifetime": 30.0, "size": 6.0 },
                "special": { "variant": { "kind": "area", "damage": 2.0,
                             "shape": { "shape": "burst", "radius": 100.0, "delay": 10.0 } } }
            }"#,
        )
        .unwrap();
        assert!(matches!(p.movement, MovementMode::Flight { .. }));
        assert!(matches!(p.attack, AttackVariant::Projectile { .. }));
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(Params::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = Params::from_json(r#"{ "camera_smoothing": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("camera_smoothing"));

        let err = Params::from_json(r#"{ "level": { "max_levels": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("max_levels"));

        let err = Params::from_json(r#"{ "attack": { "kind": "melee", "range": -1.0, "damage": 1.0 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("attack"));
    }

    #[test]
    fn rings_thinner_than_a_long_tick_of_growth_are_rejected() {
        let ring = |growth: f32, thickness: f32| {
            format!(
                r#"{{ "special": {{ "variant": {{ "kind": "area", "damage": 1.0,
                     "shape": {{ "shape": "ring", "max_radius": 200.0, "growth": {growth:?}, "thickness": {thickness:?} }} }} }} }}"#
            )
        };
        let err = Params::from_json(&ring(30.0, 40.0)).unwrap_err();
        assert!(err.to_string().contains("special"));
        Params::from_json(&ring(20.0, 40.0)).unwrap();
    }

    #[test]
    fn every_skin_has_a_resource_label() {
        let names: Vec<_> = Skin::ALL.iter().map(|s| s.resource_name()).collect();
        assert_eq!(names, ["sonic", "blood", "energy", "focus", "souls"]);
        assert_eq!(Skin::from_id(2), Some(Skin::DragonRider));
    }
}
