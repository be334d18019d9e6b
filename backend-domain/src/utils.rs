use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate};

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, whose date part is kept.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let trimmed = date.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(parsed);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|value| value.date_naive())
        .map_err(|err| anyhow!("'{}' is not an ISO date: {}", trimmed, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 19).expect("date");
        assert_eq!(parse_date("2022-01-19").expect("plain"), expected);
        assert_eq!(parse_date("2022-01-19T10:00:00+01:00").expect("rfc3339"), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("2022-02-30").is_err());
        assert!(parse_date("").is_err());
    }
}
