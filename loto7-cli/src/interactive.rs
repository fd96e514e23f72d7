use std::path::Path;

use anyhow::{Context, Result};
use loto7_db::rusqlite::Connection;
use loto7_ensemble::config::ConfigFile;
use loto7_ensemble::sampler::RecommendedSet;

use crate::display::display_recommendations;
use super::{DEFAULT_MODELS, prompt};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Add,
    Random,
    Predict,
    Last,
    History,
    Stats,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "ajouter" | "add" => Some(InteractiveCommand::Add),
        "2" | "aleatoire" | "aléatoire" | "random" | "rand" => Some(InteractiveCommand::Random),
        "3" | "predire" | "prédire" | "predict" | "pred" => Some(InteractiveCommand::Predict),
        "4" | "dernieres" | "dernières" | "last" => Some(InteractiveCommand::Last),
        "5" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "stats" | "statistiques" => Some(InteractiveCommand::Stats),
        "7" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif LOTO7 ──");
    println!("  1. ajouter    Ajouter un tirage");
    println!("  2. aleatoire  Grilles aléatoires");
    println!("  3. predire    Grilles recommandées par les modèles");
    println!("  4. dernieres  Réafficher les dernières grilles");
    println!("  5. historique Derniers tirages");
    println!("  6. stats      Numéros les plus fréquents");
    println!("  7. quitter    Quitter");
    println!();
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_seed() -> Result<Option<u64>> {
    let seed_str = prompt_with_default("Seed (vide = aléatoire)", "")?;
    if seed_str.is_empty() {
        Ok(None)
    } else {
        Ok(Some(seed_str.parse().context("Seed invalide")?))
    }
}

/// Grilles générées pendant la session, réaffichables sans nouveau tirage.
#[derive(Debug, Default)]
struct Session {
    last_random: Option<Vec<RecommendedSet>>,
    last_scored: Option<Vec<RecommendedSet>>,
}

impl Session {
    fn show_last(&self) {
        if self.last_random.is_none() && self.last_scored.is_none() {
            println!("Aucune grille générée pendant cette session.");
            return;
        }
        if let Some(sets) = &self.last_random {
            display_recommendations("Dernières grilles aléatoires", sets);
        }
        if let Some(sets) = &self.last_scored {
            display_recommendations("Dernières grilles recommandées", sets);
        }
    }
}

fn cmd_random_interactive(settings: &ConfigFile, session: &mut Session) -> Result<()> {
    let seed = prompt_seed()?;
    let sets = super::cmd_random(&settings.engine, seed)?;
    session.last_random = Some(sets);
    Ok(())
}

fn cmd_predict_interactive(conn: &Connection, settings: &ConfigFile, session: &mut Session) -> Result<()> {
    let models = prompt_with_default("Fichier des modèles", DEFAULT_MODELS)?;
    let seed = prompt_seed()?;
    let sets = super::cmd_predict(conn, &settings.engine, Path::new(&models), seed)?;
    session.last_scored = Some(sets);
    Ok(())
}

fn cmd_history_interactive(conn: &Connection) -> Result<()> {
    let n_str = prompt_with_default("Nombre de tirages", "10")?;
    let n: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_list(conn, n)
}

fn cmd_stats_interactive(conn: &Connection, settings: &ConfigFile) -> Result<()> {
    let n_str = prompt_with_default("Nombre de numéros", "10")?;
    let top: usize = n_str.parse().context("Nombre invalide")?;
    super::cmd_stats(conn, top, &settings.engine)
}

pub fn run_interactive(conn: &Connection, settings: &ConfigFile) -> Result<()> {
    println!("Bienvenue dans le mode interactif de loto7 !");
    let mut session = Session::default();

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let outcome = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Add) => super::cmd_add(conn, &settings.engine),
            Some(InteractiveCommand::Random) => cmd_random_interactive(settings, &mut session),
            Some(InteractiveCommand::Predict) => cmd_predict_interactive(conn, settings, &mut session),
            Some(InteractiveCommand::Last) => {
                session.show_last();
                Ok(())
            }
            Some(InteractiveCommand::History) => cmd_history_interactive(conn),
            Some(InteractiveCommand::Stats) => cmd_stats_interactive(conn, settings),
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-7) ou un nom de commande.", input);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("Erreur: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Add));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Random));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Last));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("ajouter"), Some(InteractiveCommand::Add));
        assert_eq!(parse_command("aléatoire"), Some(InteractiveCommand::Random));
        assert_eq!(parse_command("predire"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("dernieres"), Some(InteractiveCommand::Last));
        assert_eq!(parse_command("historique"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("stats"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_aliases_and_case() {
        assert_eq!(parse_command("RANDOM"), Some(InteractiveCommand::Random));
        assert_eq!(parse_command(" Pred "), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("8"), None);
    }

    #[test]
    fn test_session_starts_empty() {
        let session = Session::default();
        assert!(session.last_random.is_none());
        assert!(session.last_scored.is_none());
    }
}
