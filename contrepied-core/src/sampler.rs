use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GenerationConfig;
use crate::decorrelation::Batch;
use crate::error::Result;
use crate::models::{NumberSpace, Ticket};
use crate::rules;
use crate::scoring::popularity_score;

/// Comment une grille a été retenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Règles, décorrélation et seuil de score respectés.
    Clean,
    /// Essais épuisés : meilleur candidat valide et décorrélé, au-dessus du seuil.
    BestEffort,
    /// Aucun candidat n'a passé les règles strictes : tirage libre.
    Unconstrained,
}

impl Acceptance {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Acceptance::Clean)
    }
}

impl fmt::Display for Acceptance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acceptance::Clean => write!(f, "OK"),
            Acceptance::BestEffort => write!(f, "MEILLEUR EFFORT"),
            Acceptance::Unconstrained => write!(f, "LIBRE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTicket {
    pub ticket: Ticket,
    pub score: u32,
    pub acceptance: Acceptance,
    pub attempts: usize,
}

/// Issue d'un essai.
enum Attempt {
    HardRejected,
    TooSimilar,
    Scored(Ticket, u32),
}

#[derive(Debug, Default)]
struct RoundStats {
    hard_rejected: usize,
    too_similar: usize,
    scored: usize,
}

fn attempt<R: Rng + ?Sized>(
    space: &NumberSpace,
    config: &GenerationConfig,
    batch: &Batch,
    rng: &mut R,
) -> Attempt {
    let candidate = Ticket::random(space, rng);
    if rules::is_rejected(&candidate, config) {
        return Attempt::HardRejected;
    }
    if batch.too_similar(&candidate, config) {
        return Attempt::TooSimilar;
    }
    let score = popularity_score(&candidate, config.soft_sum_band());
    Attempt::Scored(candidate, score)
}

/// Un tour de génération : premier candidat sous le seuil, sinon le meilleur vu,
/// sinon un tirage libre. Se termine toujours en `tries_per_ticket` essais au plus.
fn generate_one<R: Rng + ?Sized>(
    space: &NumberSpace,
    config: &GenerationConfig,
    batch: &Batch,
    rng: &mut R,
) -> (GeneratedTicket, RoundStats) {
    let mut stats = RoundStats::default();
    let mut best: Option<(Ticket, u32)> = None;

    for tries in 1..=config.tries_per_ticket {
        match attempt(space, config, batch, rng) {
            Attempt::HardRejected => stats.hard_rejected += 1,
            Attempt::TooSimilar => stats.too_similar += 1,
            Attempt::Scored(ticket, score) => {
                stats.scored += 1;
                if score <= config.max_score {
                    let accepted = GeneratedTicket {
                        ticket,
                        score,
                        acceptance: Acceptance::Clean,
                        attempts: tries,
                    };
                    return (accepted, stats);
                }
                if best.as_ref().is_none_or(|(_, s)| score < *s) {
                    best = Some((ticket, score));
                }
            }
        }
    }

    let (ticket, score, acceptance) = match best {
        Some((ticket, score)) => (ticket, score, Acceptance::BestEffort),
        None => {
            let ticket = Ticket::random(space, rng);
            let score = popularity_score(&ticket, config.soft_sum_band());
            (ticket, score, Acceptance::Unconstrained)
        }
    };

    let accepted = GeneratedTicket {
        ticket,
        score,
        acceptance,
        attempts: config.tries_per_ticket,
    };
    (accepted, stats)
}

/// Génère exactement `n` grilles avec un générateur fourni par l'appelant.
pub fn generate_with_rng<R: Rng + ?Sized>(
    n: usize,
    space: &NumberSpace,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<Vec<GeneratedTicket>> {
    config.validate(space)?;

    let mut batch = Batch::new();
    let mut generated = Vec::with_capacity(n);

    for k in 1..=n {
        let (accepted, stats) = generate_one(space, config, &batch, rng);

        log::debug!(
            "grille {k}/{n} : {} score={} [{}] essais={} (rejets={}, trop proches={}, notés={})",
            accepted.ticket,
            accepted.score,
            accepted.acceptance,
            accepted.attempts,
            stats.hard_rejected,
            stats.too_similar,
            stats.scored,
        );
        match accepted.acceptance {
            Acceptance::Clean => {}
            Acceptance::BestEffort => log::warn!(
                "grille {k}/{n} : aucun candidat sous le seuil {} en {} essais, meilleur score {} retenu",
                config.max_score,
                config.tries_per_ticket,
                accepted.score,
            ),
            Acceptance::Unconstrained => log::warn!(
                "grille {k}/{n} : aucun candidat ne respecte les règles strictes, tirage libre"
            ),
        }

        batch.push(accepted.ticket.clone());
        generated.push(accepted);
    }

    Ok(generated)
}

/// Génère exactement `n` grilles. Même seed + même configuration = même lot.
pub fn generate(
    n: usize,
    space: &NumberSpace,
    config: &GenerationConfig,
) -> Result<Vec<GeneratedTicket>> {
    let mut rng: StdRng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    generate_with_rng(n, space, config, &mut rng)
}

/// Bilan d'un lot, pour détecter des seuils trop stricts.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub clean: usize,
    pub best_effort: usize,
    pub unconstrained: usize,
    pub mean_score: f64,
    pub max_score: u32,
}

impl BatchSummary {
    pub fn from_batch(batch: &[GeneratedTicket]) -> Self {
        let count = |kind: Acceptance| batch.iter().filter(|g| g.acceptance == kind).count();
        let total_score: u32 = batch.iter().map(|g| g.score).sum();
        let mean_score = if batch.is_empty() {
            0.0
        } else {
            total_score as f64 / batch.len() as f64
        };

        BatchSummary {
            total: batch.len(),
            clean: count(Acceptance::Clean),
            best_effort: count(Acceptance::BestEffort),
            unconstrained: count(Acceptance::Unconstrained),
            mean_score,
            max_score: batch.iter().map(|g| g.score).max().unwrap_or(0),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.clean < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorrelation::overlap;
    use crate::error::ConfigError;
    use crate::models::Game;

    fn seeded(game: Game, seed: u64) -> GenerationConfig {
        GenerationConfig {
            seed: Some(seed),
            ..GenerationConfig::for_game(game)
        }
    }

    #[test]
    fn test_exact_count_returned() {
        let space = Game::SuperLotto.space();
        let config = seeded(Game::SuperLotto, 42);
        for n in [0, 1, 5, 10, 25] {
            let batch = generate(n, &space, &config).unwrap();
            assert_eq!(batch.len(), n, "devrait retourner exactement {n} grilles");
        }
    }

    #[test]
    fn test_tickets_are_valid() {
        for game in [Game::SuperLotto, Game::DoubleColor] {
            let space = game.space();
            let batch = generate(20, &space, &seeded(game, 7)).unwrap();
            for g in &batch {
                assert!(space.check(&g.ticket).is_ok(), "{:?} : {}", game, g.ticket);
                assert!(g.ticket.pool_a().windows(2).all(|w| w[0] < w[1]));
                assert!(g.ticket.pool_b().windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_seed_determinism() {
        let space = Game::SuperLotto.space();
        let config = seeded(Game::SuperLotto, 42);
        let b1 = generate(5, &space, &config).unwrap();
        let b2 = generate(5, &space, &config).unwrap();
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_different_seeds_differ() {
        let space = Game::SuperLotto.space();
        let b1 = generate(5, &space, &seeded(Game::SuperLotto, 1)).unwrap();
        let b2 = generate(5, &space, &seeded(Game::SuperLotto, 2)).unwrap();
        assert_ne!(b1, b2);
    }

    #[test]
    fn test_injected_rng_matches_seeded_generate() {
        let space = Game::DoubleColor.space();
        let config = seeded(Game::DoubleColor, 9);
        let mut rng = StdRng::seed_from_u64(9);
        let injected = generate_with_rng(6, &space, &config, &mut rng).unwrap();
        assert_eq!(injected, generate(6, &space, &config).unwrap());
    }

    #[test]
    fn test_non_degraded_tickets_satisfy_rules() {
        for game in [Game::SuperLotto, Game::DoubleColor] {
            let space = game.space();
            let config = seeded(game, 123);
            for g in generate(10, &space, &config).unwrap() {
                if g.acceptance == Acceptance::Unconstrained {
                    continue;
                }
                assert!(
                    rules::violations(&g.ticket, &config).is_empty(),
                    "{} viole {:?}",
                    g.ticket,
                    rules::violations(&g.ticket, &config)
                );
                if g.acceptance == Acceptance::Clean {
                    assert!(g.score <= config.max_score);
                } else {
                    assert!(g.score > config.max_score);
                }
            }
        }
    }

    #[test]
    fn test_decorrelation_holds() {
        let space = Game::SuperLotto.space();
        let config = seeded(Game::SuperLotto, 2024);
        let batch = generate(10, &space, &config).unwrap();

        for j in 0..batch.len() {
            if batch[j].acceptance == Acceptance::Unconstrained {
                continue;
            }
            for i in 0..j {
                let a = overlap(batch[i].ticket.pool_a(), batch[j].ticket.pool_a());
                let b = overlap(batch[i].ticket.pool_b(), batch[j].ticket.pool_b());
                assert!(a <= config.max_pool_a_overlap, "grilles {i} et {j} : {a} numéros F communs");
                assert!(b <= config.max_pool_b_overlap, "grilles {i} et {j} : {b} numéros B communs");
            }
        }
    }

    #[test]
    fn test_disjoint_front_pools() {
        let space = Game::SuperLotto.space();
        let config = GenerationConfig {
            max_pool_a_overlap: 0,
            tries_per_ticket: 5000,
            ..seeded(Game::SuperLotto, 42)
        };
        let batch = generate(5, &space, &config).unwrap();
        assert_eq!(batch.len(), 5);
        for i in 0..batch.len() {
            for j in (i + 1)..batch.len() {
                assert_eq!(
                    overlap(batch[i].ticket.pool_a(), batch[j].ticket.pool_a()),
                    0,
                    "{} / {}",
                    batch[i].ticket,
                    batch[j].ticket
                );
            }
        }
    }

    #[test]
    fn test_unreachable_threshold_still_terminates() {
        let space = Game::SuperLotto.space();
        // Bande de somme impossible : chaque grille coûte au moins 1 point.
        let config = GenerationConfig {
            max_score: 0,
            soft_sum_low: 1000,
            soft_sum_high: 2000,
            tries_per_ticket: 30,
            ..seeded(Game::SuperLotto, 5)
        };
        let batch = generate(8, &space, &config).unwrap();
        assert_eq!(batch.len(), 8);
        for g in &batch {
            assert!(g.acceptance.is_degraded());
            assert!(g.score >= 1);
            assert_eq!(g.attempts, 30);
        }
        assert!(BatchSummary::from_batch(&batch).is_degraded());
    }

    #[test]
    fn test_impossible_hard_rules_fall_back_to_free_draw() {
        let space = Game::SuperLotto.space();
        let config = GenerationConfig {
            max_run_allowed: 0,
            tries_per_ticket: 10,
            ..seeded(Game::SuperLotto, 11)
        };
        let batch = generate(4, &space, &config).unwrap();
        assert_eq!(batch.len(), 4);
        assert!(batch.iter().all(|g| g.acceptance == Acceptance::Unconstrained));
        assert!(batch.iter().all(|g| space.check(&g.ticket).is_ok()));
    }

    #[test]
    fn test_pool_b_value_cap() {
        let space = Game::DoubleColor.space();
        let config = GenerationConfig {
            tries_per_ticket: 200,
            ..seeded(Game::DoubleColor, 77)
        };
        assert_eq!(config.pool_b_value_cap, Some(1));
        let batch = generate(10, &space, &config).unwrap();

        let mut seen = std::collections::HashSet::new();
        for g in batch.iter().filter(|g| g.acceptance != Acceptance::Unconstrained) {
            let blue = g.ticket.pool_b()[0];
            assert!(seen.insert(blue), "numéro B {} réutilisé", blue);
        }
    }

    #[test]
    fn test_invalid_config_fails_before_sampling() {
        let space = Game::SuperLotto.space();
        let config = GenerationConfig {
            sum_low: 150,
            sum_high: 50,
            ..GenerationConfig::default()
        };
        assert_eq!(
            generate(5, &space, &config),
            Err(ConfigError::InvertedBounds { name: "sum", low: 150, high: 50 })
        );
    }

    #[test]
    fn test_summary() {
        let t = Ticket::new(vec![2, 8, 15, 21, 28], vec![3, 11]).unwrap();
        let make = |score, acceptance| GeneratedTicket {
            ticket: t.clone(),
            score,
            acceptance,
            attempts: 1,
        };
        let batch = vec![
            make(1, Acceptance::Clean),
            make(3, Acceptance::Clean),
            make(8, Acceptance::BestEffort),
            make(4, Acceptance::Unconstrained),
        ];
        let summary = BatchSummary::from_batch(&batch);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.clean, 2);
        assert_eq!(summary.best_effort, 1);
        assert_eq!(summary.unconstrained, 1);
        assert_eq!(summary.max_score, 8);
        assert!((summary.mean_score - 4.0).abs() < 1e-10);
        assert!(summary.is_degraded());

        let empty = BatchSummary::from_batch(&[]);
        assert_eq!(empty.total, 0);
        assert!(!empty.is_degraded());
    }
}
