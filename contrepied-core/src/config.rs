use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::models::{Game, NumberSpace};

/// Seuils de génération. Construit une fois par exécution, en lecture seule ensuite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // Règles strictes (pool A sauf mention contraire)
    pub max_run_allowed: usize,
    pub max_same_last_digit: usize,
    pub odd_low: usize,
    pub odd_high: usize,
    pub sum_low: u32,
    pub sum_high: u32,
    pub avoid_pool_b_consecutive: bool,

    // Score de popularité
    pub max_score: u32,
    pub soft_sum_low: u32,
    pub soft_sum_high: u32,

    // Décorrélation dans le lot
    pub max_pool_a_overlap: usize,
    pub max_pool_b_overlap: usize,
    pub pool_b_value_cap: Option<usize>,

    pub tries_per_ticket: usize,
    pub seed: Option<u64>,
}

impl GenerationConfig {
    pub fn for_game(game: Game) -> Self {
        match game {
            Game::SuperLotto => Self {
                max_run_allowed: 2,
                max_same_last_digit: 2,
                odd_low: 1,
                odd_high: 4,
                sum_low: 45,
                sum_high: 135,
                avoid_pool_b_consecutive: false,
                max_score: 3,
                soft_sum_low: 60,
                soft_sum_high: 120,
                max_pool_a_overlap: 2,
                max_pool_b_overlap: 1,
                pool_b_value_cap: None,
                tries_per_ticket: 50,
                seed: None,
            },
            // Une seule boule bleue parmi 16 : le recouvrement par paire ne suffit pas,
            // on plafonne l'usage de chaque valeur.
            Game::DoubleColor => Self {
                max_run_allowed: 2,
                max_same_last_digit: 2,
                odd_low: 1,
                odd_high: 5,
                sum_low: 60,
                sum_high: 150,
                avoid_pool_b_consecutive: false,
                max_score: 3,
                soft_sum_low: 75,
                soft_sum_high: 130,
                max_pool_a_overlap: 2,
                max_pool_b_overlap: 1,
                pool_b_value_cap: Some(1),
                tries_per_ticket: 50,
                seed: None,
            },
        }
    }

    /// Échoue immédiatement sur toute incohérence, sans jamais corriger les valeurs.
    pub fn validate(&self, space: &NumberSpace) -> Result<()> {
        space.validate()?;

        let pairs = [
            ("odd", self.odd_low as u32, self.odd_high as u32),
            ("sum", self.sum_low, self.sum_high),
            ("soft_sum", self.soft_sum_low, self.soft_sum_high),
        ];
        for (name, low, high) in pairs {
            if low > high {
                return Err(ConfigError::InvertedBounds { name, low, high });
            }
        }

        if self.tries_per_ticket == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }

    pub fn soft_sum_band(&self) -> (u32, u32) {
        (self.soft_sum_low, self.soft_sum_high)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Complète un JSON partiel avec les valeurs par défaut du jeu choisi.
    pub fn from_json_for_game(json: &str, game: Game) -> serde_json::Result<Self> {
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(fields) = overlay else {
            return serde_json::from_value(overlay);
        };
        let mut base = serde_json::to_value(Self::for_game(game))?;
        if let Some(base) = base.as_object_mut() {
            base.extend(fields);
        }
        serde_json::from_value(base)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::for_game(Game::default())
    }
}
