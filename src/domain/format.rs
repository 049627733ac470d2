//! Display helpers for article metadata.

use chrono::{DateTime, Utc};

pub const TITLE_MAX_LEN: usize = 80;
pub const DESCRIPTION_MAX_LEN: usize = 150;

/// Truncate to `max_len` characters, appending "..." when shortened.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len).collect();
    out.push_str("...");
    out
}

/// Strip a trailing " - Source" attribution and truncate.
pub fn format_title(title: &str, max_len: usize) -> String {
    if title.is_empty() {
        return "Untitled".to_string();
    }
    let clean = match title.rfind(" - ") {
        Some(idx) if !title[idx + 3..].contains('-') && idx > 0 => &title[..idx],
        _ => title,
    };
    truncate_text(clean, max_len)
}

pub fn format_description(description: Option<&str>, max_len: usize) -> String {
    match description {
        Some(d) if !d.trim().is_empty() => truncate_text(d, max_len),
        _ => "No description available".to_string(),
    }
}

/// "A", "A and B", or "A and N others" for comma-separated author lists.
pub fn format_author(author: Option<&str>) -> String {
    let Some(author) = author.filter(|a| !a.trim().is_empty()) else {
        return "Unknown Author".to_string();
    };
    if !author.contains(',') {
        return author.to_string();
    }
    let authors: Vec<&str> = author.split(',').map(str::trim).collect();
    if authors.len() > 2 {
        format!("{} and {} others", authors[0], authors.len() - 1)
    } else {
        authors.join(" and ")
    }
}

pub fn format_relative_time(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return "Unknown time".to_string();
    };
    let delta = now.signed_duration_since(date);
    let secs = delta.num_seconds();
    if secs < 0 {
        return "in the future".to_string();
    }
    let (value, unit) = if secs < 60 {
        return "less than a minute ago".to_string();
    } else if secs < 3600 {
        (delta.num_minutes(), "minute")
    } else if secs < 86_400 {
        (delta.num_hours(), "hour")
    } else if secs < 86_400 * 30 {
        (delta.num_days(), "day")
    } else if secs < 86_400 * 365 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };
    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Dates render as "Mar 01, 2024".
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "Invalid date".to_string())
}

/// Host name of a URL, or an empty string when it does not parse.
pub fn domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Remove HTML tags and entities and the "[+123 chars]" marker NewsAPI appends.
pub fn clean_content(content: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        text.push(' ');
                        last_was_space = true;
                    }
                } else {
                    text.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    let decoded = html_escape::decode_html_entities(text.trim()).to_string();
    match decoded.rfind("[+") {
        Some(idx) if decoded.ends_with("chars]") => decoded[..idx].trim_end().to_string(),
        _ => decoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_format_title_strips_source() {
        assert_eq!(
            format_title("Markets rally on news - Reuters", TITLE_MAX_LEN),
            "Markets rally on news"
        );
        assert_eq!(format_title("", TITLE_MAX_LEN), "Untitled");
        assert_eq!(format_title("Plain title", TITLE_MAX_LEN), "Plain title");
    }

    #[test]
    fn test_format_description() {
        assert_eq!(format_description(None, 10), "No description available");
        assert_eq!(format_description(Some("  "), 10), "No description available");
        assert_eq!(format_description(Some("0123456789abc"), 10), "0123456789...");
    }

    #[test]
    fn test_format_author() {
        assert_eq!(format_author(None), "Unknown Author");
        assert_eq!(format_author(Some("Jane Doe")), "Jane Doe");
        assert_eq!(format_author(Some("Jane, John")), "Jane and John");
        assert_eq!(format_author(Some("Jane, John, Ann")), "Jane and 2 others");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(None, now), "Unknown time");
        assert_eq!(
            format_relative_time(Some(now - Duration::seconds(30)), now),
            "less than a minute ago"
        );
        assert_eq!(
            format_relative_time(Some(now - Duration::hours(1)), now),
            "1 hour ago"
        );
        assert_eq!(
            format_relative_time(Some(now - Duration::hours(5)), now),
            "5 hours ago"
        );
        assert_eq!(
            format_relative_time(Some(now - Duration::days(3)), now),
            "3 days ago"
        );
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)), "Mar 01, 2024");
        assert_eq!(format_date(None), "Invalid date");
    }

    #[test]
    fn test_domain() {
        assert_eq!(domain("https://www.bbc.co.uk/news/1"), "www.bbc.co.uk");
        assert_eq!(domain("not a url"), "");
    }

    #[test]
    fn test_clean_content() {
        assert_eq!(
            clean_content("<p>Hello &amp; welcome</p> to   the news… [+1234 chars]"),
            "Hello & welcome to the news…"
        );
        assert_eq!(clean_content("no markers"), "no markers");
    }
}
