use thiserror::Error;

/// Erreurs de configuration, levées avant tout tirage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Pool vide : le maximum doit être au moins 1")]
    EmptyPool,

    #[error("Impossible de choisir {count} numéros parmi {max}")]
    PickCountExceedsMax { count: usize, max: u8 },

    #[error("Bornes incohérentes pour {name} : {low} > {high}")]
    InvertedBounds { name: &'static str, low: u32, high: u32 },

    #[error("Le nombre d'essais par grille doit être au moins 1")]
    NoAttempts,

    #[error("Grille invalide : {0}")]
    InvalidTicket(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
