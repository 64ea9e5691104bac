use crate::error::ConfigError;
use crate::genetic_algorithm::Meta;
use crate::instance::EnergyModel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elite_size: usize,
    pub tournament_size: usize,
    pub mutation_probability: f64,
    pub crossover_probability: f64,
    pub battery_capacity: f64,
    pub consumption_rate: f64,
    pub charging_rate: f64,
    pub w1: f64,
    pub w2: f64,
    pub single_customer_penalty: f64,
    pub infeasibility_threshold: f64,
    pub seed: u64,
    // Relative slack under which a customer counts as lying on the border
    // between its nearest depot and another one.
    pub border_ratio: f64,
    // Chance that a mutation event moves a customer across depots rather
    // than reordering a single route.
    pub inter_depot_share: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        GeneticConfig {
            population_size: 50,
            generations: 100,
            elite_size: 2,
            tournament_size: 5,
            mutation_probability: 0.3,
            crossover_probability: 0.8,
            battery_capacity: 100.0,
            consumption_rate: 1.0,
            charging_rate: 1.0,
            w1: 0.6,
            w2: 0.4,
            single_customer_penalty: 0.5,
            infeasibility_threshold: 1e8,
            seed: 42,
            border_ratio: 0.2,
            inter_depot_share: 0.7,
        }
    }
}

impl GeneticConfig {
    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel {
            battery_capacity: self.battery_capacity,
            consumption_rate: self.consumption_rate,
            charging_rate: self.charging_rate,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        if self.elite_size == 0 {
            return Err(ConfigError::ZeroEliteSize);
        }

        if self.elite_size > self.population_size {
            return Err(ConfigError::EliteSizeTooLarge {
                elite_size: self.elite_size,
                population_size: self.population_size,
            });
        }

        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }

        if self.tournament_size > self.population_size {
            return Err(ConfigError::TournamentSizeTooLarge {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }

        for (name, value) in [
            ("mutation_probability", self.mutation_probability),
            ("crossover_probability", self.crossover_probability),
            ("border_ratio", self.border_ratio),
            ("inter_depot_share", self.inter_depot_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("battery_capacity", self.battery_capacity),
            ("consumption_rate", self.consumption_rate),
            ("charging_rate", self.charging_rate),
            ("infeasibility_threshold", self.infeasibility_threshold),
        ] {
            // NaN fails this comparison as well
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveParameter { name, value });
            }
        }

        Ok(())
    }
}

impl Meta for GeneticConfig {
    fn population_size(&self) -> usize {
        self.population_size
    }

    fn elite_size(&self) -> usize {
        self.elite_size
    }

    fn generations(&self) -> usize {
        self.generations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GeneticConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_oversized_selection_parameters() {
        let config = GeneticConfig {
            population_size: 4,
            elite_size: 5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EliteSizeTooLarge {
                elite_size: 5,
                population_size: 4
            })
        );

        let config = GeneticConfig {
            population_size: 4,
            elite_size: 1,
            tournament_size: 6,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TournamentSizeTooLarge {
                tournament_size: 6,
                population_size: 4
            })
        );
    }

    #[test]
    fn rejects_running_without_elites() {
        let config = GeneticConfig {
            elite_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroEliteSize));
    }

    #[test]
    fn rejects_probabilities_outside_unit_interval() {
        let config = GeneticConfig {
            mutation_probability: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "mutation_probability",
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_non_positive_energy_parameters() {
        let config = GeneticConfig {
            charging_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveParameter {
                name: "charging_rate",
                value: 0.0
            })
        );
    }
}
