mod analysis;
mod display;
mod import;
mod interactive;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::compute_stats;
use crate::display::{
    display_draws, display_import_summary, display_recommendations, display_scores,
    display_stats,
};
use crate::import::parse_date;
use loto7_db::db::{count_draws, db_path, draw_exists, fetch_all_draws, fetch_last_draws, insert_draw, migrate, open_db};
use loto7_db::models::{BONUS_COUNT, DrawRecord, PICK_COUNT, validate_draw};
use loto7_ensemble::config::{ConfigFile, EngineConfig, load_config};
use loto7_ensemble::ensemble::model_file::{load_models, save_models};
use loto7_ensemble::recommend::{recommend_random, recommend_scored};
use loto7_ensemble::sampler::{RecommendedSet, seeded_rng};
use loto7_ensemble::training::train_predictors;

const DEFAULT_MODELS: &str = "models_loto7.json";

#[derive(Parser)]
#[command(name = "loto7", about = "Analyse des tirages LOTO7 et grilles recommandées")]
struct Cli {
    /// Fichier de configuration JSON (clés absentes = valeurs par défaut)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/LOTO7_ALL.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Classement des numéros les plus fréquents
    Stats {
        /// Nombre de numéros à afficher
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Grilles purement aléatoires
    Random {
        /// Nombre de grilles
        #[arg(short, long)]
        count: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Entraîner un prédicteur par numéro sur l'historique
    Train {
        /// Fichier de sortie des modèles
        #[arg(short, long, default_value = DEFAULT_MODELS)]
        output: PathBuf,

        #[arg(long)]
        epochs: Option<usize>,

        #[arg(long)]
        learning_rate: Option<f64>,

        #[arg(long)]
        lambda: Option<f64>,
    },

    /// Grilles tirées parmi les numéros les mieux notés par les modèles
    Predict {
        /// Fichier des modèles entraînés
        #[arg(short, long, default_value = DEFAULT_MODELS)]
        models: PathBuf,

        /// Nombre de grilles
        #[arg(short, long)]
        count: Option<usize>,

        /// Taille du pool des meilleurs scores
        #[arg(long)]
        top_k: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Mode interactif (menu)
    Interactive,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    let engine = &settings.engine;
    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file, engine),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { top } => cmd_stats(&conn, top, engine),
        Command::Add => cmd_add(&conn, engine),
        Command::Random { count, seed } => {
            let engine = with_overrides(engine, count, None);
            cmd_random(&engine, seed).map(|_| ())
        }
        Command::Train { output, epochs, learning_rate, lambda } => {
            let mut settings = settings.clone();
            if let Some(e) = epochs {
                settings.training.epochs = e;
            }
            if let Some(lr) = learning_rate {
                settings.training.learning_rate = lr;
            }
            if let Some(l) = lambda {
                settings.training.lambda = l;
            }
            cmd_train(&conn, &settings, &output)
        }
        Command::Predict { models, count, top_k, seed } => {
            let engine = with_overrides(engine, count, top_k);
            cmd_predict(&conn, &engine, &models, seed).map(|_| ())
        }
        Command::Interactive => interactive::run_interactive(&conn, &settings),
    }
}

fn load_settings(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(p) => load_config(p),
        None => Ok(ConfigFile::default()),
    }
}

fn with_overrides(engine: &EngineConfig, count: Option<usize>, top_k: Option<usize>) -> EngineConfig {
    let mut engine = engine.clone();
    if let Some(c) = count {
        engine.n_sets = c;
    }
    if let Some(k) = top_k {
        engine.top_k = k;
    }
    engine
}

fn require_history(conn: &loto7_db::rusqlite::Connection) -> Result<u32> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : loto7 import");
    }
    Ok(n)
}

fn cmd_import(conn: &loto7_db::rusqlite::Connection, file: &Path, engine: &EngineConfig) -> Result<()> {
    let result = import::import_csv(conn, file, engine.max_number)?;
    display_import_summary(&result);
    Ok(())
}

pub(crate) fn cmd_list(conn: &loto7_db::rusqlite::Connection, last: u32) -> Result<()> {
    require_history(conn)?;
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

pub(crate) fn cmd_stats(conn: &loto7_db::rusqlite::Connection, top: usize, engine: &EngineConfig) -> Result<()> {
    let n = require_history(conn)?;
    let draws = fetch_all_draws(conn)?;
    let stats = compute_stats(&draws, engine.max_number)?;
    display_stats(&stats, top, n);
    Ok(())
}

pub(crate) fn cmd_random(engine: &EngineConfig, seed: Option<u64>) -> Result<Vec<RecommendedSet>> {
    let mut rng = seeded_rng(seed);
    let sets = recommend_random(engine, &mut rng)?;
    display_recommendations("Grilles aléatoires", &sets);
    Ok(sets)
}

fn cmd_train(conn: &loto7_db::rusqlite::Connection, settings: &ConfigFile, output: &Path) -> Result<()> {
    require_history(conn)?;
    let draws = fetch_all_draws(conn)?;
    let engine = &settings.engine;

    println!(
        "Entraînement de {} prédicteurs sur {} tirages (fenêtre {})...",
        engine.max_number, draws.len(), engine.window
    );

    let pb = ProgressBar::new(engine.max_number as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .context("Modèle de barre de progression invalide")?
        .progress_chars("=> "));

    let models = train_predictors(&draws, engine, &settings.training, |n| {
        pb.set_message(format!("numéro {n}"));
        pb.inc(1);
    })?;
    pb.finish_with_message("Entraînement terminé");

    save_models(&models, output)?;
    println!(
        "\n{} prédicteurs ({} exemples) sauvegardés dans : {}",
        models.predictors.len(),
        models.n_samples,
        output.display()
    );
    Ok(())
}

pub(crate) fn cmd_predict(
    conn: &loto7_db::rusqlite::Connection,
    engine: &EngineConfig,
    models_path: &Path,
    seed: Option<u64>,
) -> Result<Vec<RecommendedSet>> {
    let draws = fetch_all_draws(conn)?;
    let predictors = load_models(models_path, engine)
        .context("Impossible de charger les modèles. Lancez d'abord : loto7 train")?;

    let mut rng = seeded_rng(seed);
    let rec = recommend_scored(&draws, &predictors, engine, &mut rng)?;

    display_scores(&rec.scores, &rec.features, engine.top_k);
    display_recommendations("Grilles recommandées par les modèles", &rec.sets);
    Ok(rec.sets)
}

pub(crate) fn cmd_add(conn: &loto7_db::rusqlite::Connection, engine: &EngineConfig) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let raw_date = prompt("Date du tirage (AAAA-MM-JJ) : ")?;
    let date = parse_date(&raw_date)?;
    if draw_exists(conn, date)? {
        println!("Un tirage est déjà enregistré au {date}.");
        return Ok(());
    }

    let numbers: [u8; PICK_COUNT] = prompt_numbers("numéros principaux", engine.max_number)?;
    let bonus: [u8; BONUS_COUNT] = prompt_numbers("numéros bonus", engine.max_number)?;

    validate_draw(&numbers, &bonus, engine.max_number)?;
    let draw = DrawRecord::new(date, numbers, bonus);

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

pub(crate) fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        bail!("Entrée interrompue");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers<const N: usize>(label: &str, max_number: u8) -> Result<[u8; N]> {
    loop {
        let input = prompt(&format!("{} {} (séparés par des espaces, 1-{}) : ", N, label, max_number))?;
        match parse_numbers::<N>(&input, max_number) {
            Some(arr) => return Ok(arr),
            None => println!("Entrez exactement {} numéros distincts entre 1 et {}. Réessayez.", N, max_number),
        }
    }
}

fn parse_numbers<const N: usize>(input: &str, max_number: u8) -> Option<[u8; N]> {
    let nums: Vec<u8> = input
        .split_whitespace()
        .map(|s| s.parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    let arr: [u8; N] = nums.try_into().ok()?;
    let in_range = arr.iter().all(|&n| n >= 1 && n <= max_number);
    let distinct = (0..N).all(|i| !arr[i + 1..].contains(&arr[i]));
    (in_range && distinct).then_some(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_ok() {
        assert_eq!(parse_numbers::<7>("3 14 22 5 37 1 9", 37), Some([3, 14, 22, 5, 37, 1, 9]));
        assert_eq!(parse_numbers::<2>(" 8   30 ", 37), Some([8, 30]));
    }

    #[test]
    fn test_parse_numbers_rejects_bad_input() {
        assert_eq!(parse_numbers::<7>("1 2 3 4 5 6", 37), None);
        assert_eq!(parse_numbers::<7>("1 2 3 4 5 6 38", 37), None);
        assert_eq!(parse_numbers::<7>("1 2 3 4 5 6 6", 37), None);
        assert_eq!(parse_numbers::<2>("a b", 37), None);
        assert_eq!(parse_numbers::<2>("0 4", 37), None);
    }

    #[test]
    fn test_with_overrides() {
        let base = EngineConfig::default();
        let engine = with_overrides(&base, Some(3), Some(15));
        assert_eq!(engine.n_sets, 3);
        assert_eq!(engine.top_k, 15);
        assert_eq!(engine.window, base.window);

        let unchanged = with_overrides(&base, None, None);
        assert_eq!(unchanged, base);
    }

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from(["loto7", "predict", "--count", "3", "--seed", "42"]).unwrap();
        match cli.command {
            Command::Predict { models, count, top_k, seed } => {
                assert_eq!(models, PathBuf::from(DEFAULT_MODELS));
                assert_eq!(count, Some(3));
                assert_eq!(top_k, None);
                assert_eq!(seed, Some(42));
            }
            _ => panic!("commande inattendue"),
        }
    }

    #[test]
    fn test_cli_global_config() {
        let cli = Cli::try_parse_from(["loto7", "random", "--config", "loto7.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("loto7.json")));
    }
}
