use chrono::{Duration, NaiveDate};
use loto7_db::models::DrawRecord;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Tirages hebdomadaires à partir du 2024-01-05, numéros valides pour N=37.
pub fn make_test_history(n: usize) -> Vec<DrawRecord> {
    let start = date(2024, 1, 5);
    (0..n)
        .map(|i| {
            let base = (i % 5) as u8 * 7;
            DrawRecord::new(
                start + Duration::days(7 * i as i64),
                [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6, base + 7],
                [36, 37],
            )
        })
        .collect()
}
