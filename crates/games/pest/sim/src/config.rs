use crate::error::ConfigError;
use pest_types::{EmplacementKind, InvaderKind, ProjectileKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmplacementSpec {
    pub cost: u32,
    pub hp: i32,
    /// Ticks between attacks. Unused by kinds that never fire.
    pub cooldown: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvaderSpec {
    pub hp: i32,
    /// Pixels per tick while advancing and dry.
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub damage: i32,
    /// Pixels per tick.
    pub speed: f32,
}

/// Relative spawn weights for the four regular pest tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub aphid: f64,
    pub spider_mite: f64,
    pub mealybug: f64,
    pub snail: f64,
}

impl SpawnWeights {
    pub fn total(&self) -> f64 {
        self.aphid + self.spider_mite + self.mealybug + self.snail
    }

    /// Map a uniform draw in `[0, 1)` onto a regular tier.
    pub fn kind_for_draw(&self, draw: f64) -> InvaderKind {
        let scaled = draw * self.total();
        let buckets = [
            (self.aphid, InvaderKind::Aphid),
            (self.spider_mite, InvaderKind::SpiderMite),
            (self.mealybug, InvaderKind::Mealybug),
        ];
        let mut upper = 0.0;
        for (weight, kind) in buckets {
            upper += weight;
            if scaled < upper {
                return kind;
            }
        }
        InvaderKind::Snail
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestConfig {
    // Board
    pub rows: u32,
    pub cols: u32,
    pub cell_width: f32,
    /// Invaders appear this far past the right edge of the board.
    pub spawn_offset: f32,

    // Economy
    pub starting_light: u32,
    pub regen_interval: u64,
    pub regen_amount: u32,
    pub wave_clear_bonus: u32,

    // Waves
    pub max_waves: u32,
    pub first_spawn_tick: u64,
    pub spawn_interval_base: u64,
    pub spawn_interval_step: u64,
    pub spawn_interval_floor: u64,
    pub pests_per_wave_base: u32,
    pub pests_per_wave_growth: u32,
    pub hp_per_wave: i32,
    pub spawn_weights: SpawnWeights,

    // Emplacements
    pub mister: EmplacementSpec,
    pub uv_lamp: EmplacementSpec,
    pub sticky_trap: EmplacementSpec,
    pub flytrap: EmplacementSpec,
    pub lamp_income_period: u32,
    pub lamp_income: u32,
    pub flytrap_capture_radius: f32,
    pub flytrap_digest_ticks: u32,
    pub flytrap_damage: i32,
    pub flytrap_boss_damage: i32,

    // Invaders
    pub aphid: InvaderSpec,
    pub spider_mite: InvaderSpec,
    pub mealybug: InvaderSpec,
    pub snail: InvaderSpec,
    pub boss_slug: InvaderSpec,
    pub siege_range: f32,
    pub siege_interval: u32,
    pub siege_damage: i32,
    pub boss_siege_multiplier: i32,

    // Projectiles and status effects
    pub water: ProjectileSpec,
    pub uv_beam: ProjectileSpec,
    pub impact_tolerance: f32,
    pub wet_duration: u32,
    pub wet_speed_factor: f32,
    pub wet_crit_multiplier: i32,
}

impl PestConfig {
    pub fn emplacement(&self, kind: EmplacementKind) -> &EmplacementSpec {
        match kind {
            EmplacementKind::Mister => &self.mister,
            EmplacementKind::UvLamp => &self.uv_lamp,
            EmplacementKind::StickyTrap => &self.sticky_trap,
            EmplacementKind::Flytrap => &self.flytrap,
        }
    }

    pub fn invader(&self, kind: InvaderKind) -> &InvaderSpec {
        match kind {
            InvaderKind::Aphid => &self.aphid,
            InvaderKind::SpiderMite => &self.spider_mite,
            InvaderKind::Mealybug => &self.mealybug,
            InvaderKind::Snail => &self.snail,
            InvaderKind::BossSlug => &self.boss_slug,
        }
    }

    pub fn projectile(&self, kind: ProjectileKind) -> &ProjectileSpec {
        match kind {
            ProjectileKind::Water => &self.water,
            ProjectileKind::UvBeam => &self.uv_beam,
        }
    }

    /// Ticks between spawns within `wave`, never below the configured floor.
    pub fn spawn_interval(&self, wave: u32) -> u64 {
        self.spawn_interval_base
            .saturating_sub(u64::from(wave) * self.spawn_interval_step)
            .max(self.spawn_interval_floor)
    }

    pub fn pests_per_wave(&self, wave: u32) -> u32 {
        self.pests_per_wave_base + self.pests_per_wave_growth * wave
    }

    pub fn invader_hp(&self, kind: InvaderKind, wave: u32) -> i32 {
        let bonus = self.hp_per_wave * wave.saturating_sub(1) as i32;
        self.invader(kind).hp + bonus
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PestConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.rows == 0 {
            return invalid("rows", "must be at least 1");
        }
        if self.cols == 0 {
            return invalid("cols", "must be at least 1");
        }
        if !(self.cell_width > 0.0) {
            return invalid("cell_width", "must be positive");
        }
        if self.max_waves == 0 {
            return invalid("max_waves", "must be at least 1");
        }
        if self.spawn_interval_floor == 0 {
            return invalid("spawn_interval_floor", "must be at least 1");
        }
        if self.regen_interval == 0 {
            return invalid("regen_interval", "must be at least 1");
        }
        if self.lamp_income_period == 0 {
            return invalid("lamp_income_period", "must be at least 1");
        }
        if self.siege_interval == 0 {
            return invalid("siege_interval", "must be at least 1");
        }
        let w = &self.spawn_weights;
        if [w.aphid, w.spider_mite, w.mealybug, w.snail]
            .iter()
            .any(|weight| !(*weight >= 0.0))
        {
            return invalid("spawn_weights", "weights must be non-negative");
        }
        if !(w.total() > 0.0) {
            return invalid("spawn_weights", "weights must sum to a positive total");
        }
        Ok(())
    }
}

impl Default for PestConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 9,
            cell_width: 80.0,
            spawn_offset: 20.0,

            starting_light: 500,
            regen_interval: 100,
            regen_amount: 25,
            wave_clear_bonus: 100,

            max_waves: 10,
            first_spawn_tick: 80,
            spawn_interval_base: 200,
            spawn_interval_step: 15,
            spawn_interval_floor: 45,
            pests_per_wave_base: 8,
            pests_per_wave_growth: 4,
            hp_per_wave: 15,
            spawn_weights: SpawnWeights {
                aphid: 0.40,
                spider_mite: 0.25,
                mealybug: 0.20,
                snail: 0.15,
            },

            mister: EmplacementSpec {
                cost: 100,
                hp: 100,
                cooldown: 35,
            },
            uv_lamp: EmplacementSpec {
                cost: 75,
                hp: 100,
                cooldown: 60,
            },
            sticky_trap: EmplacementSpec {
                cost: 50,
                hp: 800,
                cooldown: 0,
            },
            flytrap: EmplacementSpec {
                cost: 150,
                hp: 200,
                cooldown: 0,
            },
            lamp_income_period: 300,
            lamp_income: 25,
            flytrap_capture_radius: 30.0,
            flytrap_digest_ticks: 250,
            flytrap_damage: 1000,
            flytrap_boss_damage: 300,

            aphid: InvaderSpec {
                hp: 60,
                speed: 0.5,
            },
            spider_mite: InvaderSpec {
                hp: 45,
                speed: 0.8,
            },
            mealybug: InvaderSpec {
                hp: 120,
                speed: 0.35,
            },
            snail: InvaderSpec {
                hp: 220,
                speed: 0.25,
            },
            boss_slug: InvaderSpec {
                hp: 1600,
                speed: 0.15,
            },
            siege_range: 20.0,
            siege_interval: 15,
            siege_damage: 10,
            boss_siege_multiplier: 5,

            water: ProjectileSpec {
                damage: 20,
                speed: 4.0,
            },
            uv_beam: ProjectileSpec {
                damage: 30,
                speed: 8.0,
            },
            impact_tolerance: 25.0,
            wet_duration: 180,
            wet_speed_factor: 0.7,
            wet_crit_multiplier: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_shrinks_to_floor() {
        let config = PestConfig::default();
        assert_eq!(config.spawn_interval(1), 185);
        assert_eq!(config.spawn_interval(5), 125);
        assert_eq!(config.spawn_interval(10), 50);
        assert_eq!(config.spawn_interval(11), 45);
        assert_eq!(config.spawn_interval(40), 45);
    }

    #[test]
    fn test_quota_and_hp_scale_with_wave() {
        let config = PestConfig::default();
        assert_eq!(config.pests_per_wave(1), 12);
        assert_eq!(config.pests_per_wave(10), 48);
        assert_eq!(config.invader_hp(InvaderKind::Aphid, 1), 60);
        assert_eq!(config.invader_hp(InvaderKind::Aphid, 4), 105);
    }

    #[test]
    fn test_default_weights_map_to_documented_buckets() {
        let weights = PestConfig::default().spawn_weights;
        assert_eq!(weights.kind_for_draw(0.0), InvaderKind::Aphid);
        assert_eq!(weights.kind_for_draw(0.399), InvaderKind::Aphid);
        assert_eq!(weights.kind_for_draw(0.41), InvaderKind::SpiderMite);
        assert_eq!(weights.kind_for_draw(0.649), InvaderKind::SpiderMite);
        assert_eq!(weights.kind_for_draw(0.66), InvaderKind::Mealybug);
        assert_eq!(weights.kind_for_draw(0.849), InvaderKind::Mealybug);
        assert_eq!(weights.kind_for_draw(0.86), InvaderKind::Snail);
        assert_eq!(weights.kind_for_draw(0.9999), InvaderKind::Snail);
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config = PestConfig::from_json_str(r#"{ "starting_light": 0, "max_waves": 3 }"#).unwrap();
        assert_eq!(config.starting_light, 0);
        assert_eq!(config.max_waves, 3);
        assert_eq!(config.rows, 5);
        assert_eq!(config.mister.cost, 100);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = PestConfig::from_json_str(r#"{ "rows": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rows", .. }));

        let err = PestConfig::from_json_str(
            r#"{ "spawn_weights": { "aphid": 0, "spider_mite": 0, "mealybug": 0, "snail": 0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "spawn_weights", .. }));

        let err = PestConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
