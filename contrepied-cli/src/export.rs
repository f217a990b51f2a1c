use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use contrepied_core::GeneratedTicket;
use contrepied_core::models::join_numbers;

pub fn write_csv<W: Write>(writer: W, batch: &[GeneratedTicket]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["index", "pool_a_numbers", "pool_b_numbers", "popularity_score"])?;

    for (i, g) in batch.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            join_numbers(g.ticket.pool_a()),
            join_numbers(g.ticket.pool_b()),
            g.score.to_string(),
        ])?;
    }

    wtr.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}

pub fn export_csv(path: &Path, batch: &[GeneratedTicket]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;
    write_csv(file, batch).with_context(|| format!("Export vers {:?} échoué", path))
}
