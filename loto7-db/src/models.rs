use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Nombre de numéros principaux par tirage.
pub const PICK_COUNT: usize = 7;
/// Nombre de numéros bonus par tirage.
pub const BONUS_COUNT: usize = 2;
/// Plus grand numéro tirable dans la configuration LOTO7.
pub const MAX_NUMBER: u8 = 37;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: [u8; BONUS_COUNT],
}

impl DrawRecord {
    pub fn new(date: NaiveDate, numbers: [u8; PICK_COUNT], bonus: [u8; BONUS_COUNT]) -> Self {
        Self { date, numbers, bonus }
    }

    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut sorted = self.numbers;
        sorted.sort();
        sorted
    }

    pub fn sorted_bonus(&self) -> [u8; BONUS_COUNT] {
        let mut sorted = self.bonus;
        sorted.sort();
        sorted
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

pub fn validate_draw(numbers: &[u8; PICK_COUNT], bonus: &[u8; BONUS_COUNT], max_number: u8) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > max_number {
            bail!("Numéro {} hors limites (1-{})", n, max_number);
        }
    }
    for &b in bonus {
        if b < 1 || b > max_number {
            bail!("Numéro bonus {} hors limites (1-{})", b, max_number);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if bonus[0] == bonus[1] {
        bail!("Numéro bonus en double : {}", bonus[0]);
    }
    if let Some(b) = bonus.iter().find(|b| numbers.contains(b)) {
        bail!("Le numéro bonus {} figure déjà parmi les numéros principaux", b);
    }
    Ok(())
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[8, 9], MAX_NUMBER).is_ok());
        assert!(validate_draw(&[37, 36, 35, 34, 33, 32, 31], &[1, 2], MAX_NUMBER).is_ok());
    }

    #[test]
    fn test_validate_draw_number_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6, 7], &[8, 9], MAX_NUMBER).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 38], &[8, 9], MAX_NUMBER).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[0, 9], MAX_NUMBER).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[8, 38], MAX_NUMBER).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_numbers() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6, 7], &[8, 9], MAX_NUMBER).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_bonus() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[9, 9], MAX_NUMBER).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_overlaps_numbers() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[7, 9], MAX_NUMBER).is_err());
    }

    #[test]
    fn test_validate_draw_smaller_domain() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 7], &[8, 9], 9).is_ok());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6, 10], &[8, 9], 9).is_err());
    }

    #[test]
    fn test_sorted_numbers() {
        let draw = DrawRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            [30, 2, 17, 5, 11, 24, 8],
            [33, 1],
        );
        assert_eq!(draw.sorted_numbers(), [2, 5, 8, 11, 17, 24, 30]);
        assert_eq!(draw.sorted_bonus(), [1, 33]);
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[1, 12, 37]), " 1 - 12 - 37");
    }
}
