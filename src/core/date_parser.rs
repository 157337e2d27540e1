//! Indeed 相對日期文字解析 ("today", "Sep 16", "Sun")

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use std::sync::LazyLock;

// "on" 只能整個字移除，否則 "mon" 會變成 "m"
static NOISE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:applied|on indeed|on)\b").expect("noise word pattern is valid")
});

/// Leap year used only to read month/day pairs such as "Feb 29".
const PROBE_YEAR: i32 = 2000;

/// 將 Indeed 的日期文字轉成絕對日期。
///
/// 無法辨識的文字一律回傳 `now` 的日期，不會回傳錯誤。
pub fn parse_date_text(text: &str, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    let clean = clean_date_text(text);

    if clean.is_empty() || clean.contains("today") {
        return today;
    }

    if clean.contains("yesterday") {
        return today.pred_opt().unwrap_or(today);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&clean, "%Y-%m-%d") {
        return date;
    }

    if let Some(date) = parse_month_day(&clean, today) {
        return date;
    }

    if let Some(date) = parse_weekday(&clean, today) {
        return date;
    }

    tracing::debug!("Unrecognised date text '{}', falling back to {}", text, today);
    today
}

fn clean_date_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    NOISE_WORDS
        .replace_all(&lowered, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Sep 16" 取最近一個不晚於今天的日期
fn parse_month_day(clean: &str, today: NaiveDate) -> Option<NaiveDate> {
    let probe =
        NaiveDate::parse_from_str(&format!("{} {}", clean, PROBE_YEAR), "%b %d %Y").ok()?;

    (0..=4)
        .filter_map(|back| NaiveDate::from_ymd_opt(today.year() - back, probe.month(), probe.day()))
        .find(|date| *date <= today)
}

/// 星期縮寫取今天之前最近的一天，同一天視為上週
fn parse_weekday(clean: &str, today: NaiveDate) -> Option<NaiveDate> {
    let prefix: String = clean.chars().take(3).collect();
    let target = match prefix.as_str() {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };

    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let days_ago = match (current - wanted).rem_euclid(7) {
        0 => 7,
        n => n,
    };

    today.checked_sub_days(Days::new(days_ago as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        let now = at(2025, 1, 12);
        assert_eq!(parse_date_text("today", now), date(2025, 1, 12));
        assert_eq!(parse_date_text("Applied Today", now), date(2025, 1, 12));
        assert_eq!(parse_date_text("yesterday", now), date(2025, 1, 11));
        assert_eq!(parse_date_text("Applied yesterday on Indeed", at(2025, 3, 1)), date(2025, 2, 28));
    }

    #[test]
    fn test_empty_text_is_today() {
        let now = at(2025, 6, 2);
        assert_eq!(parse_date_text("", now), date(2025, 6, 2));
        assert_eq!(parse_date_text("Applied on Indeed", now), date(2025, 6, 2));
    }

    #[test]
    fn test_month_day_wraps_to_previous_year() {
        assert_eq!(parse_date_text("Sep 16", at(2025, 1, 12)), date(2024, 9, 16));
        assert_eq!(parse_date_text("Applied on Sep 16", at(2025, 10, 1)), date(2025, 9, 16));
        assert_eq!(parse_date_text("Jan 12", at(2025, 1, 12)), date(2025, 1, 12));
        assert_eq!(parse_date_text("Oct 5", at(2025, 10, 19)), date(2025, 10, 5));
    }

    #[test]
    fn test_feb_29_resolves_to_last_leap_year() {
        assert_eq!(parse_date_text("Feb 29", at(2025, 3, 10)), date(2024, 2, 29));
    }

    #[test]
    fn test_weekday_looks_strictly_backward() {
        // 2025-01-12 是星期日
        let now = at(2025, 1, 12);
        assert_eq!(parse_date_text("Sun", now), date(2025, 1, 5));
        assert_eq!(parse_date_text("Sat", now), date(2025, 1, 11));
        assert_eq!(parse_date_text("Applied on Mon", now), date(2025, 1, 6));
        assert_eq!(parse_date_text("Monday", now), date(2025, 1, 6));
    }

    #[test]
    fn test_weekday_never_returns_today() {
        let names = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        for offset in 0..7 {
            let now = at(2025, 1, 6 + offset);
            for name in names {
                let parsed = parse_date_text(name, now);
                assert!(parsed < now.date(), "{} on {} gave {}", name, now, parsed);
                assert!(now.date() - parsed <= chrono::Duration::days(7));
                assert_eq!(parsed.weekday().to_string(), name);
            }
        }
    }

    #[test]
    fn test_iso_date_passes_through() {
        assert_eq!(parse_date_text("2024-11-03", at(2025, 1, 12)), date(2024, 11, 3));
    }

    #[test]
    fn test_unrecognised_text_falls_back_to_today() {
        let now = at(2025, 1, 12);
        assert_eq!(parse_date_text("last spring", now), date(2025, 1, 12));
        assert_eq!(parse_date_text("Sep 45", now), date(2025, 1, 12));
    }
}
