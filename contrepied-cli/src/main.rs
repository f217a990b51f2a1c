mod display;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{ArgAction, Args, Parser, Subcommand};

use contrepied_core::rules::violations;
use contrepied_core::scoring::score_breakdown;
use contrepied_core::{BatchSummary, Game, GenerationConfig, NumberSpace, Ticket, generate};

use crate::display::{display_batch, display_breakdown, display_summary, display_violations};

#[derive(Parser)]
#[command(
    name = "contrepied",
    about = "Grilles de loterie à contre-pied des choix populaires",
    long_about = "Génère des grilles qui évitent les motifs les plus joués (dates, suites, \
                  progressions, nombres ronds) et qui se recoupent peu entre elles.\n\
                  Les chances de gagner restent identiques : seul le partage du gain diminue."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer un lot de grilles
    Generate {
        #[command(flatten)]
        settings: Settings,

        /// Nombre de grilles
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long, conflicts_with = "daily_seed")]
        seed: Option<u64>,

        /// Utiliser la date du jour (YYYYMMDD) comme seed
        #[arg(long)]
        daily_seed: bool,

        /// Exporter le lot en CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Détailler le score de popularité d'une grille (ex: "01 05 12 23 35 | 03 11")
    Score {
        ticket: Ticket,

        #[command(flatten)]
        settings: Settings,
    },

    /// Vérifier une grille contre les règles strictes
    Check {
        ticket: Ticket,

        #[command(flatten)]
        settings: Settings,
    },

    /// Afficher ou écrire la configuration par défaut d'un jeu
    Config {
        /// Jeu
        #[arg(short, long, default_value = "super-lotto")]
        game: Game,

        /// Fichier de sortie (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Jeu, fichier de configuration et surcharges individuelles.
#[derive(Args, Debug, Clone)]
struct Settings {
    /// Jeu
    #[arg(short, long, default_value = "super-lotto")]
    game: Game,

    /// Fichier de configuration JSON (remplace les valeurs par défaut du jeu)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Args, Debug, Clone, Default)]
struct Overrides {
    /// Score de popularité maximal accepté
    #[arg(long)]
    max_score: Option<u32>,

    /// Longueur maximale d'une suite consécutive
    #[arg(long)]
    max_run: Option<usize>,

    /// Nombre maximal de numéros partageant le même dernier chiffre
    #[arg(long)]
    max_same_last_digit: Option<usize>,

    /// Nombre minimal d'impairs
    #[arg(long)]
    odd_low: Option<usize>,

    /// Nombre maximal d'impairs
    #[arg(long)]
    odd_high: Option<usize>,

    /// Somme minimale (règle stricte)
    #[arg(long)]
    sum_low: Option<u32>,

    /// Somme maximale (règle stricte)
    #[arg(long)]
    sum_high: Option<u32>,

    /// Bas de la bande de somme « naturelle » (score)
    #[arg(long)]
    soft_sum_low: Option<u32>,

    /// Haut de la bande de somme « naturelle » (score)
    #[arg(long)]
    soft_sum_high: Option<u32>,

    /// Rejeter les numéros B consécutifs (true/false, seul = true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
    avoid_b_consecutive: Option<bool>,

    /// Numéros F communs maximum entre deux grilles
    #[arg(long)]
    max_a_overlap: Option<usize>,

    /// Numéros B communs maximum entre deux grilles
    #[arg(long)]
    max_b_overlap: Option<usize>,

    /// Utilisations maximales d'une même valeur B dans le lot
    #[arg(long)]
    b_value_cap: Option<usize>,

    /// Essais par grille
    #[arg(long)]
    tries: Option<usize>,
}

impl Overrides {
    fn apply(&self, config: &mut GenerationConfig) {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *target = v;
            }
        }

        set(&mut config.max_score, self.max_score);
        set(&mut config.max_run_allowed, self.max_run);
        set(&mut config.max_same_last_digit, self.max_same_last_digit);
        set(&mut config.odd_low, self.odd_low);
        set(&mut config.odd_high, self.odd_high);
        set(&mut config.sum_low, self.sum_low);
        set(&mut config.sum_high, self.sum_high);
        set(&mut config.soft_sum_low, self.soft_sum_low);
        set(&mut config.soft_sum_high, self.soft_sum_high);
        set(&mut config.max_pool_a_overlap, self.max_a_overlap);
        set(&mut config.max_pool_b_overlap, self.max_b_overlap);
        set(&mut config.tries_per_ticket, self.tries);
        set(&mut config.avoid_pool_b_consecutive, self.avoid_b_consecutive);
        if self.b_value_cap.is_some() {
            config.pool_b_value_cap = self.b_value_cap;
        }
    }
}

impl Settings {
    /// Défauts du jeu → fichier JSON → options de la ligne de commande.
    fn resolve(&self) -> Result<(NumberSpace, GenerationConfig)> {
        let space = self.game.space();
        let mut config = match &self.config {
            Some(path) => load_config(path, self.game)?,
            None => GenerationConfig::for_game(self.game),
        };
        self.overrides.apply(&mut config);
        config.validate(&space).context("Configuration invalide")?;
        log::debug!("configuration retenue : {:?}", config);
        Ok((space, config))
    }
}

fn load_config(path: &Path, game: Game) -> Result<GenerationConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    GenerationConfig::from_json_for_game(&json, game)
        .with_context(|| format!("JSON invalide dans {:?}", path))
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            settings,
            count,
            seed,
            daily_seed,
            csv,
        } => cmd_generate(&settings, count, seed, daily_seed, csv.as_deref()),
        Command::Score { ticket, settings } => cmd_score(&ticket, &settings),
        Command::Check { ticket, settings } => cmd_check(&ticket, &settings),
        Command::Config { game, output } => cmd_config(game, output.as_deref()),
    }
}

fn cmd_generate(
    settings: &Settings,
    count: usize,
    seed: Option<u64>,
    daily_seed: bool,
    csv: Option<&Path>,
) -> Result<()> {
    let (space, mut config) = settings.resolve()?;

    if daily_seed {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        config.seed = Some(ds);
    } else if seed.is_some() {
        config.seed = seed;
    }

    println!("{} : {} grilles", settings.game, count);
    let batch = generate(count, &space, &config)?;

    display_batch(&batch);
    display_summary(&BatchSummary::from_batch(&batch), &config);

    if let Some(path) = csv {
        export::export_csv(path, &batch)?;
        println!("\nLot exporté dans : {}", path.display());
    }
    Ok(())
}

fn cmd_score(ticket: &Ticket, settings: &Settings) -> Result<()> {
    let (space, config) = settings.resolve()?;
    space.check(ticket)?;
    let breakdown = score_breakdown(ticket, config.soft_sum_band());
    display_breakdown(ticket, &breakdown, &config);
    Ok(())
}

fn cmd_check(ticket: &Ticket, settings: &Settings) -> Result<()> {
    let (space, config) = settings.resolve()?;
    space.check(ticket)?;
    display_violations(ticket, &violations(ticket, &config));
    Ok(())
}

fn cmd_config(game: Game, output: Option<&Path>) -> Result<()> {
    let json = GenerationConfig::for_game(game).to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
            println!("Configuration {} sauvegardée dans : {}", game, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
