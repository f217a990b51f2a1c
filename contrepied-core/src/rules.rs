//! Règles strictes : une grille qui en viole une seule est écartée d'office,
//! indépendamment des autres grilles du lot.

use std::fmt;

use crate::config::GenerationConfig;
use crate::models::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    RunTooLong { run: usize, max: usize },
    LastDigitConcentration { digit: u8, count: usize, max: usize },
    Parity { odd: usize, low: usize, high: usize },
    SumOutOfBounds { sum: u32, low: u32, high: u32 },
    PoolBConsecutive,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RunTooLong { run, max } => {
                write!(f, "suite de {} numéros consécutifs (max {})", run, max)
            }
            Violation::LastDigitConcentration { digit, count, max } => {
                write!(f, "{} numéros finissent par {} (max {})", count, digit, max)
            }
            Violation::Parity { odd, low, high } => {
                write!(f, "{} impairs hors de [{}, {}]", odd, low, high)
            }
            Violation::SumOutOfBounds { sum, low, high } => {
                write!(f, "somme {} hors de [{}, {}]", sum, low, high)
            }
            Violation::PoolBConsecutive => write!(f, "numéros B consécutifs"),
        }
    }
}

/// Longueur de la plus longue suite d'entiers consécutifs (entrée triée).
/// 1 = aucun voisin, 0 = pool vide.
pub fn longest_run(numbers: &[u8]) -> usize {
    if numbers.is_empty() {
        return 0;
    }
    let mut best = 1;
    let mut current = 1;
    for w in numbers.windows(2) {
        if w[1].checked_sub(w[0]) == Some(1) {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}

pub fn last_digit_counts(numbers: &[u8]) -> [usize; 10] {
    let mut counts = [0usize; 10];
    for &n in numbers {
        counts[(n % 10) as usize] += 1;
    }
    counts
}

/// (chiffre, effectif) du dernier chiffre le plus fréquent.
pub fn max_same_last_digit(numbers: &[u8]) -> (u8, usize) {
    let counts = last_digit_counts(numbers);
    let (digit, &count) = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .unwrap_or((0, &0));
    (digit as u8, count)
}

pub fn odd_count(numbers: &[u8]) -> usize {
    numbers.iter().filter(|&&n| n % 2 == 1).count()
}

pub fn sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| n as u32).sum()
}

pub fn has_adjacent_pair(numbers: &[u8]) -> bool {
    numbers.windows(2).any(|w| w[1].checked_sub(w[0]) == Some(1))
}

type Rule = fn(&Ticket, &GenerationConfig) -> Option<Violation>;

const RULES: [Rule; 5] = [
    check_run,
    check_last_digit,
    check_parity,
    check_sum,
    check_pool_b_adjacent,
];

fn check_run(ticket: &Ticket, config: &GenerationConfig) -> Option<Violation> {
    let front = ticket.pool_a();
    if front.len() < 2 {
        return None;
    }
    let run = longest_run(front);
    (run > config.max_run_allowed).then_some(Violation::RunTooLong {
        run,
        max: config.max_run_allowed,
    })
}

fn check_last_digit(ticket: &Ticket, config: &GenerationConfig) -> Option<Violation> {
    let front = ticket.pool_a();
    if front.len() < 2 {
        return None;
    }
    let (digit, count) = max_same_last_digit(front);
    (count > config.max_same_last_digit).then_some(Violation::LastDigitConcentration {
        digit,
        count,
        max: config.max_same_last_digit,
    })
}

fn check_parity(ticket: &Ticket, config: &GenerationConfig) -> Option<Violation> {
    let odd = odd_count(ticket.pool_a());
    (odd < config.odd_low || odd > config.odd_high).then_some(Violation::Parity {
        odd,
        low: config.odd_low,
        high: config.odd_high,
    })
}

fn check_sum(ticket: &Ticket, config: &GenerationConfig) -> Option<Violation> {
    let front = ticket.pool_a();
    if front.len() < 2 {
        return None;
    }
    let s = sum(front);
    (s < config.sum_low || s > config.sum_high).then_some(Violation::SumOutOfBounds {
        sum: s,
        low: config.sum_low,
        high: config.sum_high,
    })
}

fn check_pool_b_adjacent(ticket: &Ticket, config: &GenerationConfig) -> Option<Violation> {
    (config.avoid_pool_b_consecutive && has_adjacent_pair(ticket.pool_b()))
        .then_some(Violation::PoolBConsecutive)
}

/// Toutes les règles violées, dans l'ordre d'évaluation.
pub fn violations(ticket: &Ticket, config: &GenerationConfig) -> Vec<Violation> {
    RULES.iter().filter_map(|rule| rule(ticket, config)).collect()
}

/// Rejet strict ; s'arrête à la première règle violée.
pub fn is_rejected(ticket: &Ticket, config: &GenerationConfig) -> bool {
    RULES.iter().any(|rule| rule(ticket, config).is_some())
}
