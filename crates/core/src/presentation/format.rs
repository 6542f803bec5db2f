//! Number and date formatting for detail views.

use crate::catalog::ProductionCompany;

const NOT_AVAILABLE: &str = "N/A";

/// `148` -> `"2h 28m"`; missing or zero -> `"N/A"`.
pub fn format_runtime(minutes: Option<u32>) -> String {
    match minutes.filter(|m| *m > 0) {
        Some(m) => format!("{}h {}m", m / 60, m % 60),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// USD amount in millions with one decimal: `160_000_000` -> `"$160.0M"`.
pub fn format_money(amount: Option<u64>) -> String {
    let Some(amount) = amount.filter(|a| *a > 0) else {
        return NOT_AVAILABLE.to_string();
    };

    // Tenths of a million, rounded half up. Widened so u64::MAX still rounds.
    let tenths = (u128::from(amount) + 50_000) / 100_000;
    format!("${}.{}M", group_thousands(tenths / 10), tenths % 10)
}

/// `35_123` -> `"35K"`; below a thousand -> `"0K"`, as the card layout expects.
pub fn format_vote_count(count: Option<u64>) -> String {
    match count.filter(|c| *c > 0) {
        Some(c) => format!("{}K", c / 1000),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// One decimal place, `"N/A"` when unrated.
pub fn format_rating(vote_average: Option<f64>) -> String {
    match vote_average.filter(|v| *v > 0.0) {
        Some(v) => format!("{:.1}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Year part of a `YYYY-MM-DD` date.
pub fn release_year(release_date: Option<&str>) -> String {
    release_date
        .and_then(|d| d.split('-').next())
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// First three company names joined with `" • "`, `"..."` appended when
/// more exist. `None` when there are no companies.
pub fn company_line(companies: &[ProductionCompany]) -> Option<String> {
    if companies.is_empty() {
        return None;
    }

    let mut line = companies
        .iter()
        .take(3)
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" • ");
    if companies.len() > 3 {
        line.push_str("...");
    }
    Some(line)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
