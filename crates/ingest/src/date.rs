use chrono::{Datelike, NaiveDate, Utc};

use crate::re;

re!(re_iso, r"^(\d{4})-(\d{1,2})-(\d{1,2})$");
re!(re_separated, r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})$");

/// Normalize an arbitrary date-like string against the current date.
///
/// Deliberate never-fail contract: anything unparseable resolves to today.
/// Callers relying on date accuracy must cross-check against the row's
/// error list for other fields.
pub fn normalize_date(raw: &str) -> NaiveDate {
    normalize_date_with_today(raw, Utc::now().date_naive())
}

/// Same as [`normalize_date`] with an injectable "today" for tests.
pub fn normalize_date_with_today(raw: &str, today: NaiveDate) -> NaiveDate {
    let raw = raw.trim();

    // 1. Direct ISO construction handles the common canonical case.
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return date;
    }

    // 2. Explicit year-first pattern.
    if let Some(c) = re_iso().captures(raw) {
        if let Some(date) = ymd(&c, 1, 2, 3, today) {
            return date;
        }
    }

    // 3. Ambiguous A/B/C (or A-B-C): disambiguate month vs day by magnitude.
    //    First component > 12 means it must be a day (DD/MM); second
    //    component > 12 forces MM/DD; both <= 12 defaults to the US MM/DD.
    if let Some(c) = re_separated().captures(raw) {
        let a: u32 = c[1].parse().unwrap_or(0);
        let b: u32 = c[2].parse().unwrap_or(0);
        let year = expand_year(c[3].parse().unwrap_or(0), today);

        let (month, day) = if a > 12 { (b, a) } else { (a, b) };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date;
        }
    }

    // 4. Silent fallback, preserved as the documented contract.
    today
}

/// Two-digit years expand with the current century. Forward-looking, not a
/// pivot rule: "99" becomes 2099 when run in the 2000s. Known limitation.
fn expand_year(y: i32, today: NaiveDate) -> i32 {
    if y < 100 {
        (today.year() / 100) * 100 + y
    } else {
        y
    }
}

fn ymd(c: &regex::Captures<'_>, yi: usize, mi: usize, di: usize, today: NaiveDate) -> Option<NaiveDate> {
    let y: i32 = c[yi].parse().ok()?;
    let m: u32 = c[mi].parse().ok()?;
    let d: u32 = c[di].parse().ok()?;
    NaiveDate::from_ymd_opt(expand_year(y, today), m, d)
}
