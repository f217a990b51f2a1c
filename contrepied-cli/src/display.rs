use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use contrepied_core::rules::Violation;
use contrepied_core::scoring::ScoreBreakdown;
use contrepied_core::models::join_numbers;
use contrepied_core::{Acceptance, BatchSummary, GeneratedTicket, GenerationConfig, Ticket};

fn numbers_str(numbers: &[u8]) -> String {
    join_numbers(numbers).replace(' ', " - ")
}

pub fn display_batch(batch: &[GeneratedTicket]) {
    if batch.is_empty() {
        println!("Aucune grille à afficher.");
        return;
    }

    println!("\n🎲 Grilles générées\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros F", "Numéros B", "Score", "Statut", "Essais"]);

    for (i, g) in batch.iter().enumerate() {
        let color = match g.acceptance {
            Acceptance::Clean => Color::Green,
            Acceptance::BestEffort => Color::Yellow,
            Acceptance::Unconstrained => Color::Red,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(numbers_str(g.ticket.pool_a())),
            Cell::new(numbers_str(g.ticket.pool_b())),
            Cell::new(g.score),
            Cell::new(g.acceptance.to_string()).fg(color),
            Cell::new(g.attempts),
        ]);
    }
    println!("{table}");
}

pub fn display_summary(summary: &BatchSummary, config: &GenerationConfig) {
    println!("\nBilan du lot :");
    println!("  Grilles           : {}", summary.total);
    println!("  Conformes         : {}", summary.clean);
    if summary.best_effort > 0 {
        println!("  Meilleur effort   : {}", summary.best_effort);
    }
    if summary.unconstrained > 0 {
        println!("  Tirages libres    : {}", summary.unconstrained);
    }
    println!("  Score moyen       : {:.2} (seuil {})", summary.mean_score, config.max_score);
    println!("  Score max         : {}", summary.max_score);

    if summary.is_degraded() {
        eprintln!(
            "\n⚠ Seuils trop stricts pour {} essais par grille : augmentez --tries ou relâchez les contraintes.",
            config.tries_per_ticket
        );
    }
}

pub fn display_breakdown(ticket: &Ticket, breakdown: &ScoreBreakdown, config: &GenerationConfig) {
    println!("\n🎯 Score de popularité : {}\n", ticket);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Motif", "Points"]);

    for (label, points) in breakdown.rows() {
        let cell = if points > 0 {
            Cell::new(points).fg(Color::Yellow)
        } else {
            Cell::new(points)
        };
        table.add_row(vec![Cell::new(label), cell]);
    }
    table.add_row(vec![Cell::new("Total"), Cell::new(breakdown.total())]);
    println!("{table}");

    let total = breakdown.total();
    if total <= config.max_score {
        println!("Sous le seuil ({} ≤ {}).", total, config.max_score);
    } else {
        println!("Au-dessus du seuil ({} > {}).", total, config.max_score);
    }
}

pub fn display_violations(ticket: &Ticket, violations: &[Violation]) {
    if violations.is_empty() {
        println!("{} respecte toutes les règles strictes.", ticket);
        return;
    }
    println!("{} viole {} règle(s) :", ticket, violations.len());
    for v in violations {
        println!("  - {}", v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_str() {
        assert_eq!(numbers_str(&[1, 5, 12]), "01 - 05 - 12");
        assert_eq!(numbers_str(&[]), "");
    }
}
