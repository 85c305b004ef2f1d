use chrono::{Days, NaiveDate};

/// First day that still counts as "new" when looking back `lookback_days` from `today`.
///
/// The bound is inclusive: with a 7 day window, a release dated exactly
/// `today - 7` is new.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use newmusic::foundation::utils::lookback_cutoff;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(lookback_cutoff(today, 7), NaiveDate::from_ymd_opt(2024, 2, 27).unwrap());
/// ```
pub fn lookback_cutoff(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Parses a catalog release date.
///
/// The catalog reports dates with day, month or year precision
/// (`2024-03-05`, `2024-03`, `2024`); coarser dates resolve to the first day
/// of the period.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let mut parts = raw.splitn(3, '-');

    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 1,
    };
    let day: u32 = match parts.next() {
        Some(d) => d.parse().ok()?,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}
