use std::collections::HashMap;

use crate::config::GenerationConfig;
use crate::models::{Pool, Ticket};

/// Nombre de numéros communs à deux pools triées.
pub fn overlap(a: &[u8], b: &[u8]) -> usize {
    let (mut i, mut j, mut common) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common += 1;
                i += 1;
                j += 1;
            }
        }
    }
    common
}

/// Vrai si le candidat partage trop de numéros avec au moins une grille déjà retenue.
pub fn too_similar(
    candidate: &Ticket,
    accepted: &[Ticket],
    max_pool_a_overlap: usize,
    max_pool_b_overlap: usize,
) -> bool {
    accepted.iter().any(|prev| {
        overlap(Pool::A.numbers_from(candidate), Pool::A.numbers_from(prev)) > max_pool_a_overlap
            || overlap(Pool::B.numbers_from(candidate), Pool::B.numbers_from(prev)) > max_pool_b_overlap
    })
}

/// Lot en cours : grilles retenues et compteur d'usage de chaque numéro B.
///
/// Le plafond par valeur couvre le cas où le lot dépasse le nombre de valeurs B
/// distinctes, que le recouvrement par paire ne détecte pas.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    tickets: Vec<Ticket>,
    pool_b_usage: HashMap<u8, usize>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn pool_b_usage(&self, number: u8) -> usize {
        self.pool_b_usage.get(&number).copied().unwrap_or(0)
    }

    /// Vrai si un numéro B du candidat a déjà atteint le plafond.
    pub fn exhausted(&self, candidate: &Ticket, cap: Option<usize>) -> bool {
        match cap {
            Some(cap) => candidate.pool_b().iter().any(|&n| self.pool_b_usage(n) >= cap),
            None => false,
        }
    }

    pub fn too_similar(&self, candidate: &Ticket, config: &GenerationConfig) -> bool {
        self.exhausted(candidate, config.pool_b_value_cap)
            || too_similar(
                candidate,
                &self.tickets,
                config.max_pool_a_overlap,
                config.max_pool_b_overlap,
            )
    }

    pub fn push(&mut self, ticket: Ticket) {
        for &n in ticket.pool_b() {
            *self.pool_b_usage.entry(n).or_insert(0) += 1;
        }
        self.tickets.push(ticket);
    }
}
