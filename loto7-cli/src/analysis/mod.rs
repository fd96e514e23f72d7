use anyhow::{Result, bail};
use loto7_db::models::{DrawRecord, NumberStats};

/// Fréquence de chaque numéro sur tout l'historique et retard (tirages depuis la dernière sortie).
/// `draws[0]` = tirage le plus récent. Un numéro hors de 1..=max_number fait échouer le calcul.
pub fn compute_stats(draws: &[DrawRecord], max_number: u8) -> Result<Vec<NumberStats>> {
    let mut last_seen: Vec<Option<u32>> = vec![None; max_number as usize];
    let mut stats: Vec<NumberStats> = (1..=max_number)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < stats.len() {
                stats[idx].frequency += 1;
                last_seen[idx].get_or_insert(i as u32);
            } else {
                bail!("Tirage du {} invalide : numéro {} hors limites (1-{})", draw.date, n, max_number);
            }
        }
    }

    for (stat, seen) in stats.iter_mut().zip(&last_seen) {
        stat.gap = seen.unwrap_or(draws.len() as u32);
    }

    Ok(stats)
}

/// Les `n` numéros les plus fréquents, à égalité par numéro croissant.
pub fn top_numbers(stats: &[NumberStats], n: usize) -> Vec<NumberStats> {
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
    sorted.truncate(n);
    sorted
}
