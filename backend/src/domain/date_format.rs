//! French display formats used across the patient screens.
//!
//! Dates travel as `15 Fév 2024` (short month), `15/03/1985` (numeric) or
//! ISO `2024-02-15` on input. Times are `HH:MM`.

use chrono::{Datelike, Months, NaiveDate, NaiveTime};

pub const FRENCH_MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sep", "Oct", "Nov", "Déc",
];

/// `15 Fév 2024`
pub fn format_short_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        FRENCH_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// `15/03/1985`
pub fn format_numeric_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse either an ISO date or a French short date (`15 Fév 2024`, `15 fev. 2024`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_iso_date(value) {
        return Some(date);
    }

    let mut parts = value.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_from_name(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_from_name(name: &str) -> Option<u32> {
    let wanted = fold_accents(name.trim_end_matches('.'));
    FRENCH_MONTHS
        .iter()
        .position(|m| {
            let month = fold_accents(m);
            month == wanted
                || wanted.starts_with(&month)
                || (wanted.len() >= 3 && month.starts_with(&wanted))
        })
        .map(|index| index as u32 + 1)
}

fn fold_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'É' | 'È' | 'Ê' => 'e',
            'û' | 'ù' | 'Û' | 'Ù' => 'u',
            'â' | 'à' | 'Â' | 'À' => 'a',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Date `months` calendar months later, clamped to the end of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// `3 mois`
pub fn validity_label(months: u32) -> String {
    format!("{} mois", months)
}

/// Amount with a space as thousands separator: `10 000`
pub fn format_fcfa(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}
