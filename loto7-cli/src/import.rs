use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use loto7_db::rusqlite::Connection;
use std::io::Read;
use std::path::Path;

use loto7_db::db::insert_draw;
use loto7_db::models::{BONUS_COUNT, DrawRecord, PICK_COUNT, validate_draw};

const FULLWIDTH_DIGITS: [&str; PICK_COUNT] = ["１", "２", "３", "４", "５", "６", "７"];

/// Accepte `2024-01-05`, `2024/01/05` et `2024年01月05日`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    bail!("Format de date invalide: '{}'", raw)
}

/// Position des colonnes dans le fichier, d'après l'en-tête.
/// Gère l'en-tête japonais historique et l'en-tête normalisé (`date,num1..num7,bonus1,bonus2`).
#[derive(Debug, PartialEq)]
struct Columns {
    date: usize,
    numbers: [usize; PICK_COUNT],
    bonus: [usize; BONUS_COUNT],
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let find = |candidates: &[&str]| -> Result<usize> {
            names
                .iter()
                .position(|name| candidates.contains(&name.as_str()))
                .with_context(|| format!("Colonne introuvable : {}", candidates.join(" / ")))
        };

        let date = find(&["抽選日", "date"])?;
        let mut numbers = [0usize; PICK_COUNT];
        for (i, slot) in numbers.iter_mut().enumerate() {
            let japanese = format!("数字{}", FULLWIDTH_DIGITS[i]);
            let normalized = format!("num{}", i + 1);
            *slot = find(&[japanese.as_str(), normalized.as_str()])?;
        }
        let mut bonus = [0usize; BONUS_COUNT];
        for (i, slot) in bonus.iter_mut().enumerate() {
            let japanese = format!("数字B{}", i + 1);
            let normalized = format!("bonus{}", i + 1);
            *slot = find(&[japanese.as_str(), normalized.as_str()])?;
        }

        Ok(Self { date, numbers, bonus })
    }
}

fn parse_record(record: &csv::StringRecord, columns: &Columns, max_number: u8) -> Result<DrawRecord> {
    let get = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let date = parse_date(get(columns.date)?)?;

    let mut numbers = [0u8; PICK_COUNT];
    for (slot, &idx) in numbers.iter_mut().zip(&columns.numbers) {
        *slot = get_u8(idx)?;
    }
    let mut bonus = [0u8; BONUS_COUNT];
    for (slot, &idx) in bonus.iter_mut().zip(&columns.bonus) {
        *slot = get_u8(idx)?;
    }

    validate_draw(&numbers, &bonus, max_number)
        .with_context(|| format!("Tirage du {} rejeté", date))?;

    Ok(DrawRecord::new(date, numbers, bonus))
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, max_number: u8) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_from_reader(conn, file, max_number)
}

pub fn import_from_reader<R: Read>(conn: &Connection, source: R, max_number: u8) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let columns = Columns::from_headers(reader.headers().context("En-tête CSV illisible")?)?;
    log::debug!("Colonnes détectées : {:?}", columns);

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record, &columns, max_number) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => {
                                log::debug!("Tirage du {} déjà enregistré", draw.date);
                                result.skipped += 1;
                            }
                            Err(e) => {
                                log::warn!("Erreur insertion ligne {}: {:#}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Erreur parsing ligne {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    log::info!(
        "Import : {} insérés, {} doublons, {} erreurs",
        result.inserted, result.skipped, result.errors
    );
    Ok(result)
}
