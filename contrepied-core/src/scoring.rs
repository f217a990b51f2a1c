//! Score de popularité : estime à quel point une grille ressemble aux choix
//! « intuitifs » des joueurs (dates, suites, progressions, nombres ronds).
//! Plus le score est bas, moins la grille risque d'être partagée.
//!
//! Les paliers croissent avec l'intensité du motif : un motif courant coûte
//! peu, un motif flagrant coûte cher.

use crate::models::Ticket;
use crate::rules::{has_adjacent_pair, longest_run, max_same_last_digit, odd_count, sum};

const RUN_MILD: u32 = 2;
const RUN_NEAR_FULL: u32 = 4;
const RUN_FULL: u32 = 6;

const PROGRESSION_PARTIAL: u32 = 1;
const PROGRESSION_NEAR_FULL: u32 = 3;
const PROGRESSION_FULL: u32 = 8;

/// Plus grand numéro « calendaire ».
const BIRTHDAY_MAX: u8 = 31;
const BIRTHDAY_NEAR_FULL: u32 = 1;
const BIRTHDAY_FULL: u32 = 2;

const LAST_DIGIT_THREE: u32 = 1;
const LAST_DIGIT_FOUR_PLUS: u32 = 3;

const ROUND_DIVISOR: u8 = 5;
const ROUND_PAIR: u32 = 1;
const ROUND_MANY: u32 = 2;

const EXTREME_PARITY: u32 = 1;
const UNNATURAL_SUM: u32 = 1;

/// Numéros B « porte-bonheur » les plus joués (jours de la semaine, petits chiffres).
const POPULAR_B_MAX: u8 = 7;
const B_ADJACENT: u32 = 1;
const B_POPULAR_RANGE: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub run: u32,
    pub progression: u32,
    pub birthday: u32,
    pub last_digit: u32,
    pub round_numbers: u32,
    pub parity: u32,
    pub sum: u32,
    pub pool_b: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.run
            + self.progression
            + self.birthday
            + self.last_digit
            + self.round_numbers
            + self.parity
            + self.sum
            + self.pool_b
    }

    /// Contributions nommées, pour l'affichage.
    pub fn rows(&self) -> Vec<(&'static str, u32)> {
        vec![
            ("Suite consécutive", self.run),
            ("Progression arithmétique", self.progression),
            ("Dates (≤ 31)", self.birthday),
            ("Même dernier chiffre", self.last_digit),
            ("Multiples de 5", self.round_numbers),
            ("Parité extrême", self.parity),
            ("Somme peu naturelle", self.sum),
            ("Numéros B", self.pool_b),
        ]
    }
}

/// Longueur du plus grand sous-ensemble formant une progression arithmétique exacte
/// (entrée triée, sans doublon).
///
/// Tout sous-ensemble d'une suite triée est une sous-suite : on prolonge chaque
/// paire (premier terme, raison) au lieu d'énumérer les k-combinaisons.
pub fn longest_progression(numbers: &[u8]) -> usize {
    if numbers.len() < 3 {
        return numbers.len();
    }
    let mut best = 2;
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            let step = (numbers[j] - numbers[i]) as u16;
            let mut len = 2;
            let mut next = numbers[j] as u16 + step;
            while next <= u8::MAX as u16 && numbers.binary_search(&(next as u8)).is_ok() {
                len += 1;
                next += step;
            }
            best = best.max(len);
        }
    }
    best
}

fn run_points(front: &[u8]) -> u32 {
    let n = front.len();
    let run = longest_run(front);
    if run < 3 {
        0
    } else if run >= n {
        RUN_FULL
    } else if run + 1 >= n {
        RUN_NEAR_FULL
    } else {
        RUN_MILD
    }
}

fn progression_points(front: &[u8]) -> u32 {
    let n = front.len();
    let k = longest_progression(front);
    if k < 3 {
        0
    } else if k == n {
        PROGRESSION_FULL
    } else if k + 1 == n {
        PROGRESSION_NEAR_FULL
    } else if k + 2 == n {
        PROGRESSION_PARTIAL
    } else {
        0
    }
}

fn birthday_points(front: &[u8]) -> u32 {
    let n = front.len();
    let dates = front.iter().filter(|&&x| x <= BIRTHDAY_MAX).count();
    if dates == n {
        BIRTHDAY_FULL
    } else if dates + 1 == n {
        BIRTHDAY_NEAR_FULL
    } else {
        0
    }
}

fn last_digit_points(front: &[u8]) -> u32 {
    match max_same_last_digit(front).1 {
        0..=2 => 0,
        3 => LAST_DIGIT_THREE,
        _ => LAST_DIGIT_FOUR_PLUS,
    }
}

fn round_points(front: &[u8]) -> u32 {
    match front.iter().filter(|&&x| x % ROUND_DIVISOR == 0).count() {
        0 | 1 => 0,
        2 => ROUND_PAIR,
        _ => ROUND_MANY,
    }
}

fn parity_points(front: &[u8]) -> u32 {
    let odd = odd_count(front);
    if odd == 0 || odd == front.len() {
        EXTREME_PARITY
    } else {
        0
    }
}

fn pool_b_points(back: &[u8]) -> u32 {
    let mut points = 0;
    if has_adjacent_pair(back) {
        points += B_ADJACENT;
    }
    if !back.is_empty() && back.iter().all(|&x| x <= POPULAR_B_MAX) {
        points += B_POPULAR_RANGE;
    }
    points
}

/// Détail du score. Fonction pure de la grille et de la bande de somme « naturelle ».
pub fn score_breakdown(ticket: &Ticket, soft_sum_band: (u32, u32)) -> ScoreBreakdown {
    let front = ticket.pool_a();
    let mut breakdown = ScoreBreakdown {
        pool_b: pool_b_points(ticket.pool_b()),
        ..Default::default()
    };

    // Les motifs n'ont pas de sens sur une pool d'un seul numéro.
    if front.len() < 2 {
        return breakdown;
    }

    breakdown.run = run_points(front);
    breakdown.progression = progression_points(front);
    breakdown.birthday = birthday_points(front);
    breakdown.last_digit = last_digit_points(front);
    breakdown.round_numbers = round_points(front);
    breakdown.parity = parity_points(front);

    let (low, high) = soft_sum_band;
    let s = sum(front);
    if s < low || s > high {
        breakdown.sum = UNNATURAL_SUM;
    }

    breakdown
}

pub fn popularity_score(ticket: &Ticket, soft_sum_band: (u32, u32)) -> u32 {
    score_breakdown(ticket, soft_sum_band).total()
}
