use chrono::{Local, NaiveDate, NaiveDateTime, Utc};

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Whole days from `now` until local midnight of `date`, floored.
/// Negative once the date has passed.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (midnight - now).num_seconds().div_euclid(86_400)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn counts_whole_days_until_midnight() {
        let expire = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        assert_eq!(days_until(expire, at("2026-10-22", "00:00:00")), 10);
        assert_eq!(days_until(expire, at("2026-10-22", "15:30:00")), 9);
        assert_eq!(days_until(expire, at("2026-10-31", "23:59:59")), 0);
    }

    #[test]
    fn past_dates_are_negative() {
        let expire = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        assert_eq!(days_until(expire, at("2026-11-01", "08:00:00")), -1);
        assert_eq!(days_until(expire, at("2026-11-03", "00:00:00")), -2);
    }
}
