use crate::config::PestConfig;
use pest_types::InvaderKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::Tick;

/// Where and what the next spawn will be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPlan {
    pub row: u32,
    pub kind: InvaderKind,
}

/// Wave pacing plus the seeded stream that picks lanes and pest tiers.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    wave: u32,
    pests_spawned_in_wave: u32,
    wave_ticks: Tick,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    pub fn new(seed: u64) -> Self {
        Self {
            wave: 1,
            pests_spawned_in_wave: 0,
            wave_ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn pests_spawned_in_wave(&self) -> u32 {
        self.pests_spawned_in_wave
    }

    pub fn wave_ticks(&self) -> Tick {
        self.wave_ticks
    }

    pub fn advance_clock(&mut self) {
        self.wave_ticks += 1;
    }

    pub fn quota_met(&self, config: &PestConfig) -> bool {
        self.pests_spawned_in_wave >= config.pests_per_wave(self.wave)
    }

    pub fn is_final_wave(&self, config: &PestConfig) -> bool {
        self.wave >= config.max_waves
    }

    /// True on the first-spawn tick and every interval after it.
    pub fn spawn_due(&self, config: &PestConfig) -> bool {
        let first = config.first_spawn_tick;
        self.wave_ticks >= first
            && (self.wave_ticks - first) % config.spawn_interval(self.wave) == 0
    }

    /// Decide this tick's spawn, if any, and count it against the quota.
    pub fn next_spawn(&mut self, config: &PestConfig) -> Option<SpawnPlan> {
        if !self.spawn_due(config) || self.quota_met(config) {
            return None;
        }

        let row = self.rng.gen_range(0..config.rows);
        let is_last = self.pests_spawned_in_wave + 1 == config.pests_per_wave(self.wave);
        let kind = if self.is_final_wave(config) && is_last {
            InvaderKind::BossSlug
        } else {
            config.spawn_weights.kind_for_draw(self.rng.gen::<f64>())
        };

        self.pests_spawned_in_wave += 1;
        Some(SpawnPlan { row, kind })
    }

    /// Move on to the next wave. The caller handles the bonus.
    pub fn advance_wave(&mut self) {
        self.wave += 1;
        self.pests_spawned_in_wave = 0;
        self.wave_ticks = 0;
    }

    /// Back to wave 1. The random stream continues where it left off.
    pub fn reset(&mut self) {
        self.wave = 1;
        self.pests_spawned_in_wave = 0;
        self.wave_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_spawn(director: &mut WaveDirector, config: &PestConfig) -> (Tick, SpawnPlan) {
        loop {
            director.advance_clock();
            if let Some(plan) = director.next_spawn(config) {
                return (director.wave_ticks(), plan);
            }
        }
    }

    #[test]
    fn test_spawn_schedule_follows_first_tick_and_interval() {
        let config = PestConfig::default();
        let mut director = WaveDirector::new(7);

        let (first, _) = run_until_spawn(&mut director, &config);
        assert_eq!(first, 80);
        let (second, _) = run_until_spawn(&mut director, &config);
        assert_eq!(second, 80 + 185);
        assert_eq!(director.pests_spawned_in_wave(), 2);
    }

    #[test]
    fn test_quota_caps_spawns() {
        let config = PestConfig {
            pests_per_wave_base: 0,
            pests_per_wave_growth: 2,
            spawn_interval_floor: 1,
            spawn_interval_base: 1,
            first_spawn_tick: 1,
            ..PestConfig::default()
        };
        let mut director = WaveDirector::new(1);
        let mut spawned = 0;
        for _ in 0..50 {
            director.advance_clock();
            if director.next_spawn(&config).is_some() {
                spawned += 1;
            }
        }
        assert_eq!(spawned, 2);
        assert!(director.quota_met(&config));
    }

    #[test]
    fn test_last_spawn_of_final_wave_is_boss() {
        let config = PestConfig {
            max_waves: 1,
            pests_per_wave_base: 3,
            pests_per_wave_growth: 0,
            ..PestConfig::default()
        };
        let mut director = WaveDirector::new(99);
        let kinds: Vec<_> = (0..3)
            .map(|_| run_until_spawn(&mut director, &config).1.kind)
            .collect();
        assert_eq!(kinds[2], InvaderKind::BossSlug);
        assert!(kinds[..2].iter().all(|k| !k.is_boss()));
    }

    #[test]
    fn test_same_seed_same_plans() {
        let config = PestConfig::default();
        let mut a = WaveDirector::new(42);
        let mut b = WaveDirector::new(42);
        for _ in 0..5 {
            assert_eq!(
                run_until_spawn(&mut a, &config),
                run_until_spawn(&mut b, &config)
            );
        }
    }

    #[test]
    fn test_advance_and_reset() {
        let mut director = WaveDirector::new(3);
        director.advance_clock();
        director.advance_wave();
        assert_eq!(director.wave(), 2);
        assert_eq!(director.wave_ticks(), 0);
        director.reset();
        assert_eq!(director.wave(), 1);
        assert_eq!(director.pests_spawned_in_wave(), 0);
    }
}
