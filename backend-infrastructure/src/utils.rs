use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use time::{Date, Month, OffsetDateTime};

pub fn to_ch_date(date: NaiveDate) -> Result<Date> {
    let month = Month::try_from(date.month() as u8).map_err(|err| anyhow!(err))?;
    Date::from_calendar_date(date.year(), month, date.day() as u8).map_err(|err| anyhow!(err))
}

pub fn from_ch_date(date: Date) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), u8::from(date.month()) as u32, date.day() as u32)
        .ok_or_else(|| anyhow!("date {} out of range", date))
}

pub fn to_ch_datetime(value: DateTime<Utc>) -> OffsetDateTime {
    let nanos = i128::from(value.timestamp_millis()).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn from_ch_datetime(value: OffsetDateTime) -> DateTime<Utc> {
    let millis = (value.unix_timestamp_nanos() / 1_000_000) as i64;
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_survive_the_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("date");
        assert_eq!(from_ch_date(to_ch_date(date).expect("to")).expect("from"), date);
    }

    #[test]
    fn timestamps_keep_millisecond_precision() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("ts");
        assert_eq!(from_ch_datetime(to_ch_datetime(now)), now);
    }
}
