use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Jeux pris en charge. Même forme (deux pools indépendantes), plages différentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Game {
    /// 5 parmi 35 + 2 parmi 12
    #[default]
    SuperLotto,
    /// 6 parmi 33 + 1 parmi 16
    DoubleColor,
}

impl Game {
    pub fn space(&self) -> NumberSpace {
        match self {
            Game::SuperLotto => NumberSpace {
                pool_a: PoolSpec { count: 5, max: 35 },
                pool_b: PoolSpec { count: 2, max: 12 },
            },
            Game::DoubleColor => NumberSpace {
                pool_a: PoolSpec { count: 6, max: 33 },
                pool_b: PoolSpec { count: 1, max: 16 },
            },
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::SuperLotto => write!(f, "Super Lotto (5/35 + 2/12)"),
            Game::DoubleColor => write!(f, "Double Color (6/33 + 1/16)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    A,
    B,
}

impl Pool {
    pub fn spec(&self, space: &NumberSpace) -> PoolSpec {
        match self {
            Pool::A => space.pool_a,
            Pool::B => space.pool_b,
        }
    }

    pub fn numbers_from<'a>(&self, ticket: &'a Ticket) -> &'a [u8] {
        match self {
            Pool::A => &ticket.pool_a,
            Pool::B => &ticket.pool_b,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pool::A => "F",
            Pool::B => "B",
        }
    }
}

/// Nombre de numéros à choisir (`count`) parmi `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub count: usize,
    pub max: u8,
}

impl PoolSpec {
    pub fn new(count: usize, max: u8) -> Result<Self> {
        let spec = PoolSpec { count, max };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.count > self.max as usize {
            return Err(ConfigError::PickCountExceedsMax {
                count: self.count,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn contains(&self, n: u8) -> bool {
        n >= 1 && n <= self.max
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u8> {
        let mut numbers: Vec<u8> = index::sample(rng, self.max as usize, self.count)
            .into_iter()
            .map(|i| (i + 1) as u8)
            .collect();
        numbers.sort_unstable();
        numbers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberSpace {
    pub pool_a: PoolSpec,
    pub pool_b: PoolSpec,
}

impl NumberSpace {
    pub fn new(pool_a: PoolSpec, pool_b: PoolSpec) -> Result<Self> {
        let space = NumberSpace { pool_a, pool_b };
        space.validate()?;
        Ok(space)
    }

    pub fn validate(&self) -> Result<()> {
        self.pool_a.validate()?;
        self.pool_b.validate()
    }

    /// Vérifie qu'une grille appartient à cet espace (tailles et plages).
    pub fn check(&self, ticket: &Ticket) -> Result<()> {
        for pool in [Pool::A, Pool::B] {
            let spec = pool.spec(self);
            let numbers = pool.numbers_from(ticket);
            if numbers.len() != spec.count {
                return Err(ConfigError::InvalidTicket(format!(
                    "{} attend {} numéros, reçu {}",
                    pool.label(),
                    spec.count,
                    numbers.len()
                )));
            }
            if let Some(&n) = numbers.iter().find(|&&n| !spec.contains(n)) {
                return Err(ConfigError::InvalidTicket(format!(
                    "{} : numéro {} hors limites (1-{})",
                    pool.label(),
                    n,
                    spec.max
                )));
            }
        }
        Ok(())
    }
}

impl Default for NumberSpace {
    fn default() -> Self {
        Game::default().space()
    }
}

/// Grille canonique : chaque pool est triée par ordre croissant, sans doublon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    pool_a: Vec<u8>,
    pool_b: Vec<u8>,
}

impl Ticket {
    pub fn new(mut pool_a: Vec<u8>, mut pool_b: Vec<u8>) -> Result<Self> {
        for (pool, numbers) in [(Pool::A, &mut pool_a), (Pool::B, &mut pool_b)] {
            numbers.sort_unstable();
            if numbers.first() == Some(&0) {
                return Err(ConfigError::InvalidTicket(format!(
                    "{} : le numéro 0 n'existe pas",
                    pool.label()
                )));
            }
            if let Some(w) = numbers.windows(2).find(|w| w[0] == w[1]) {
                return Err(ConfigError::InvalidTicket(format!(
                    "{} : numéro en double {}",
                    pool.label(),
                    w[0]
                )));
            }
        }
        Ok(Ticket { pool_a, pool_b })
    }

    /// Tirage uniforme, sans remise dans chaque pool.
    pub fn random<R: Rng + ?Sized>(space: &NumberSpace, rng: &mut R) -> Self {
        let pool_a = space.pool_a.draw(rng);
        let pool_b = space.pool_b.draw(rng);
        Ticket { pool_a, pool_b }
    }

    pub fn pool_a(&self) -> &[u8] {
        &self.pool_a
    }

    pub fn pool_b(&self) -> &[u8] {
        &self.pool_b
    }
}

/// Numéros sur deux chiffres, séparés par des espaces.
pub fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F: {} | B: {}",
            join_numbers(&self.pool_a),
            join_numbers(&self.pool_b)
        )
    }
}

impl FromStr for Ticket {
    type Err = ConfigError;

    /// Accepte `F: 01 05 12 23 35 | B: 03 11` ou `1 5 12 23 35 | 3 11`.
    fn from_str(s: &str) -> Result<Self> {
        let (front, back) = s
            .split_once('|')
            .ok_or_else(|| ConfigError::InvalidTicket(format!("séparateur '|' manquant dans '{}'", s)))?;

        let parse_side = |side: &str, prefix: &str| -> Result<Vec<u8>> {
            let side = side.trim();
            let side = side.strip_prefix(prefix).unwrap_or(side);
            side.split_whitespace()
                .map(|tok| {
                    tok.parse::<u8>()
                        .map_err(|_| ConfigError::InvalidTicket(format!("nombre invalide '{}'", tok)))
                })
                .collect()
        };

        Ticket::new(parse_side(front, "F:")?, parse_side(back, "B:")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_game_spaces() {
        let sl = Game::SuperLotto.space();
        assert_eq!(sl.pool_a, PoolSpec { count: 5, max: 35 });
        assert_eq!(sl.pool_b, PoolSpec { count: 2, max: 12 });

        let dc = Game::DoubleColor.space();
        assert_eq!(dc.pool_a.count, 6);
        assert_eq!(dc.pool_b.max, 16);
        assert!(sl.validate().is_ok());
        assert!(dc.validate().is_ok());
    }

    #[test]
    fn test_pool_spec_rejects_oversized_pick() {
        assert_eq!(
            PoolSpec::new(6, 5),
            Err(ConfigError::PickCountExceedsMax { count: 6, max: 5 })
        );
        assert_eq!(PoolSpec::new(0, 0), Err(ConfigError::EmptyPool));
        assert!(PoolSpec::new(5, 5).is_ok());
    }

    #[test]
    fn test_ticket_new_sorts() {
        let t = Ticket::new(vec![23, 5, 1, 35, 12], vec![11, 3]).unwrap();
        assert_eq!(t.pool_a(), &[1, 5, 12, 23, 35]);
        assert_eq!(t.pool_b(), &[3, 11]);
    }

    #[test]
    fn test_ticket_new_rejects_duplicates_and_zero() {
        assert!(Ticket::new(vec![1, 1, 3, 4, 5], vec![1, 2]).is_err());
        assert!(Ticket::new(vec![1, 2, 3, 4, 5], vec![7, 7]).is_err());
        assert!(Ticket::new(vec![0, 2, 3, 4, 5], vec![1, 2]).is_err());
    }

    #[test]
    fn test_ticket_display() {
        let t = Ticket::new(vec![1, 5, 12, 23, 35], vec![3, 11]).unwrap();
        assert_eq!(t.to_string(), "F: 01 05 12 23 35 | B: 03 11");
    }

    #[test]
    fn test_ticket_parse() {
        let t: Ticket = "F: 01 05 12 23 35 | B: 03 11".parse().unwrap();
        assert_eq!(t.pool_a(), &[1, 5, 12, 23, 35]);
        let bare: Ticket = "35 23 12 5 1 | 11 3".parse().unwrap();
        assert_eq!(t, bare);
        assert!("1 2 3 4 5".parse::<Ticket>().is_err());
        assert!("1 2 x 4 5 | 1 2".parse::<Ticket>().is_err());
    }

    #[test]
    fn test_space_check() {
        let space = Game::SuperLotto.space();
        let ok = Ticket::new(vec![1, 2, 3, 4, 35], vec![1, 12]).unwrap();
        assert!(space.check(&ok).is_ok());

        let out_of_range = Ticket::new(vec![1, 2, 3, 4, 36], vec![1, 12]).unwrap();
        assert!(space.check(&out_of_range).is_err());

        let wrong_size = Ticket::new(vec![1, 2, 3, 4], vec![1, 12]).unwrap();
        assert!(space.check(&wrong_size).is_err());
    }

    #[test]
    fn test_random_ticket_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for game in [Game::SuperLotto, Game::DoubleColor] {
            let space = game.space();
            for _ in 0..200 {
                let t = Ticket::random(&space, &mut rng);
                assert!(space.check(&t).is_ok(), "grille hors espace : {}", t);
                assert!(t.pool_a().windows(2).all(|w| w[0] < w[1]));
                assert!(t.pool_b().windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_full_pool_draw() {
        let space = NumberSpace::new(PoolSpec::new(5, 5).unwrap(), PoolSpec::new(1, 1).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let t = Ticket::random(&space, &mut rng);
        assert_eq!(t.pool_a(), &[1, 2, 3, 4, 5]);
        assert_eq!(t.pool_b(), &[1]);
    }
}
