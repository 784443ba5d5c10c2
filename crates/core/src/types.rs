/// Entity identifiers, assigned as `max(existing) + 1` within each collection.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates shown on pages and change requests (`YYYY-MM-DD`).
pub type Date = chrono::NaiveDate;

/// Today's date in the local timezone.
pub fn today() -> Date {
    chrono::Local::now().date_naive()
}

/// Next identifier for a collection: one past the largest existing id, or 1.
pub fn next_id(existing: impl Iterator<Item = DbId>) -> DbId {
    existing.max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(std::iter::empty()), 1);
    }

    #[test]
    fn next_id_is_max_plus_one_not_len_plus_one() {
        assert_eq!(next_id([3, 101, 7].into_iter()), 102);
    }
}
