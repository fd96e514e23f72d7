use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row};
use std::path::Path;

use crate::models::DrawRecord;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    date     TEXT PRIMARY KEY,
    num_1    INTEGER NOT NULL,
    num_2    INTEGER NOT NULL,
    num_3    INTEGER NOT NULL,
    num_4    INTEGER NOT NULL,
    num_5    INTEGER NOT NULL,
    num_6    INTEGER NOT NULL,
    num_7    INTEGER NOT NULL,
    bonus_1  INTEGER NOT NULL,
    bonus_2  INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str =
    "SELECT date, num_1, num_2, num_3, num_4, num_5, num_6, num_7, bonus_1, bonus_2 FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto7.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage. Retourne `false` si un tirage existe déjà à cette date.
pub fn insert_draw(conn: &Connection, draw: &DrawRecord) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (date, num_1, num_2, num_3, num_4, num_5, num_6, num_7, bonus_1, bonus_2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.numbers[6],
            draw.bonus[0],
            draw.bonus[1],
        ],
    ).with_context(|| format!("Échec de l'insertion du tirage du {}", draw.date))?;
    Ok(changed > 0)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<DrawRecord> {
    Ok(DrawRecord {
        date: row.get(0)?,
        numbers: [
            row.get::<_, u8>(1)?,
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: [
            row.get::<_, u8>(8)?,
            row.get::<_, u8>(9)?,
        ],
    })
}

/// Les `limit` tirages les plus récents, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture des tirages")?;
    Ok(draws)
}

/// Tout l'historique, du plus récent au plus ancien.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC"))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .context("Échec de la lecture des tirages")?;
    Ok(draws)
}

pub fn draw_exists(conn: &Connection, date: NaiveDate) -> Result<bool> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE date = ?1",
        [date],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
