//! Futures month letters.

/// Month letters, January first.
pub const MONTH_CODES: &str = "FGHJKMNQUVXZ";

/// Returns the letter for `month` (1..=12).
#[must_use]
pub fn month_to_code(month: u32) -> Option<char> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_CODES.chars().nth(index)
}

/// Returns the month (1..=12) encoded by `code`.
#[must_use]
pub fn code_to_month(code: char) -> Option<u32> {
    MONTH_CODES
        .chars()
        .position(|c| c == code)
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(month_to_code(1), Some('F'));
        assert_eq!(month_to_code(3), Some('H'));
        assert_eq!(month_to_code(12), Some('Z'));
        assert_eq!(code_to_month('U'), Some(9));
    }

    #[test]
    fn test_round_trip_every_month() {
        for month in 1..=12 {
            assert_eq!(code_to_month(month_to_code(month).unwrap()), Some(month));
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(month_to_code(0), None);
        assert_eq!(month_to_code(13), None);
        assert_eq!(code_to_month('A'), None);
        assert_eq!(code_to_month('h'), None);
    }
}
