use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::analysis::top_numbers;
use crate::import::ImportResult;
use loto7_db::models::{DrawRecord, NumberStats, format_numbers};
use loto7_ensemble::ensemble::ScoreMap;
use loto7_ensemble::features::FeatureVector;
use loto7_ensemble::sampler::RecommendedSet;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", "Bonus"]);
    for draw in draws {
        table.add_row(vec![
            draw.date.to_string(),
            format_numbers(&draw.sorted_numbers()),
            format_numbers(&draw.sorted_bonus()),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], top: usize, n_draws: u32) {
    println!("\n📊 Numéros les plus fréquents sur {} tirages\n", n_draws);

    let mut table = new_table(vec!["Rang", "Numéro", "Fréquence", "Retard"]);
    for (rank, stat) in top_numbers(stats, top).iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            format!("{:2}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

/// Classement des vraisemblances ; les numéros du pool top-K sont en vert.
pub fn display_scores(scores: &ScoreMap, features: &FeatureVector, top_k: usize) {
    println!("\n🎯 Vraisemblances par numéro (pool top-{})\n", top_k);

    let mut table = new_table(vec!["Rang", "Numéro", "Apparitions", "Vraisemblance", "Pool"]);
    for (rank, number) in scores.ranked().into_iter().enumerate() {
        let in_pool = rank < top_k;
        let color = if in_pool { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:2}", number)).fg(color),
            Cell::new(features.count(number).unwrap_or(0)),
            Cell::new(format!("{:.4}", scores.get(number).unwrap_or(0.0))),
            Cell::new(if in_pool { "✓" } else { "" }).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_recommendations(title: &str, sets: &[RecommendedSet]) {
    println!("\n🎲 {title}\n");

    let mut table = new_table(vec!["#", "Numéros"]);
    for (i, set) in sets.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            format_numbers(set.numbers()),
        ]);
    }
    println!("{table}");
}
