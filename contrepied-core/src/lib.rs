pub mod config;
pub mod decorrelation;
pub mod error;
pub mod models;
pub mod rules;
pub mod sampler;
pub mod scoring;

pub use config::GenerationConfig;
pub use error::ConfigError;
pub use models::{Game, NumberSpace, PoolSpec, Ticket};
pub use sampler::{Acceptance, BatchSummary, GeneratedTicket, generate, generate_with_rng};
