use crate::constants::{MAX_LOCATION_SEGMENTS, REJECTED_LOCATION_FRAGMENTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub name: String,
    pub year_text: String,
    pub location: String,
}

pub fn parse_line(line: &str) -> Option<ParsedRecord> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    parse_fields(&fields)
}

pub fn parse_fields(fields: &[&str]) -> Option<ParsedRecord> {
    let (name, year_text) = split_title(fields.first()?)?;

    let mut fields = fields;
    if fields.last()?.contains('(') {
        // Trailing "(...)" field is an annotation, not a place.
        fields = &fields[..fields.len() - 1];
    }

    let location = normalize_location(fields.last()?);
    if is_rejected_location(&location) {
        return None;
    }

    Some(ParsedRecord {
        name,
        year_text,
        location,
    })
}

/// Extracts `(name, year_text)` from the first field.
///
/// Quoted series titles take the first quoted segment as the name and the
/// first whitespace token after the last quote, minus its enclosing
/// characters, as the year. Other titles take the text before the first
/// `(` as the name and the first four characters after the last `(` as
/// the year.
pub fn split_title(field: &str) -> Option<(String, String)> {
    if field.contains('"') {
        let segments: Vec<&str> = field.split('"').collect();
        let name = segments.get(1)?.to_string();
        let token = segments.last()?.split_whitespace().next()?;
        Some((name, strip_enclosing(token).to_string()))
    } else {
        let name = field.split('(').next().unwrap_or_default().trim().to_string();
        let after_last_paren = field.rsplit('(').next().unwrap_or_default();
        let year_text: String = after_last_paren.chars().take(4).collect();
        Some((name, year_text))
    }
}

fn strip_enclosing(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

pub fn normalize_location(location: &str) -> String {
    let segments: Vec<&str> = location.split(',').collect();
    if segments.len() > MAX_LOCATION_SEGMENTS {
        segments[segments.len() - MAX_LOCATION_SEGMENTS..].join(",")
    } else {
        location.to_string()
    }
}

pub fn is_rejected_location(location: &str) -> bool {
    REJECTED_LOCATION_FRAGMENTS
        .iter()
        .any(|fragment| location.contains(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: &str, location: &str) -> ParsedRecord {
        ParsedRecord {
            name: name.to_string(),
            year_text: year.to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn quoted_series_title() {
        let parsed = parse_fields(&["\"111 Emergency\" (2011)", "Auckland, New Zealand"]);
        assert_eq!(
            parsed,
            Some(record("111 Emergency", "2011", "Auckland, New Zealand"))
        );
    }

    #[test]
    fn quoted_title_with_episode_suffix() {
        let (name, year) =
            split_title("\"#LawstinWoods\" (2013) {The Great Divide (#1.4)}").unwrap();
        assert_eq!(name, "#LawstinWoods");
        assert_eq!(year, "2013");
    }

    #[test]
    fn quoted_episode_with_inner_quotes_loses_year() {
        // The year token is taken after the last quote, not the closing one.
        let (name, year) = split_title("\"Show\" (2013) {Ep \"x\"}").unwrap();
        assert_eq!(name, "Show");
        assert_eq!(year, "");
    }

    #[test]
    fn quoted_title_with_nothing_after_quote_is_rejected() {
        assert_eq!(split_title("\"Unfinished\""), None);
    }

    #[test]
    fn plain_title_takes_four_chars_after_last_paren() {
        assert_eq!(
            split_title("Avatar (2009)"),
            Some(("Avatar".to_string(), "2009".to_string()))
        );
        assert_eq!(
            split_title("Heat (1995/I)"),
            Some(("Heat".to_string(), "1995".to_string()))
        );
        // A trailing "(TV)" marker shadows the year.
        assert_eq!(
            split_title("Duel (1971) (TV)"),
            Some(("Duel".to_string(), "TV)".to_string()))
        );
    }

    #[test]
    fn plain_title_without_paren_uses_title_prefix_as_year() {
        assert_eq!(
            split_title("Untitled"),
            Some(("Untitled".to_string(), "Unti".to_string()))
        );
    }

    #[test]
    fn trailing_annotation_field_is_dropped() {
        let parsed = parse_fields(&[
            "Avatar (2009)",
            "Kauai, Hawaii, USA",
            "(studio scenes)",
        ]);
        assert_eq!(parsed, Some(record("Avatar", "2009", "Kauai, Hawaii, USA")));
    }

    #[test]
    fn single_annotation_field_is_rejected() {
        assert_eq!(parse_fields(&["Avatar (2009)"]), None);
        assert_eq!(parse_fields(&[]), None);
    }

    #[test]
    fn long_locations_keep_last_three_segments() {
        assert_eq!(normalize_location("a,b,c,d,e"), "c,d,e");
        assert_eq!(
            normalize_location("Stage 5, Pinewood Studios, Iver Heath, Buckinghamshire, England, UK"),
            " Buckinghamshire, England, UK"
        );
        assert_eq!(normalize_location("Lviv, Ukraine"), "Lviv, Ukraine");
    }

    #[test]
    fn federal_and_highway_locations_are_rejected() {
        assert_eq!(
            parse_fields(&["Road (2001)", "Federal Way, Washington, USA"]),
            None
        );
        assert_eq!(
            parse_fields(&["Road (2001)", "Pacific Coast Highway, California, USA"]),
            None
        );
        assert_eq!(
            parse_fields(&["Road (2001)", "old highway 61, Mississippi, USA"]),
            None
        );
        assert!(is_rejected_location("federal district"));
        assert!(!is_rejected_location("Kyiv, Ukraine"));
    }

    #[test]
    fn parse_line_handles_repeated_tabs() {
        let parsed = parse_line("\"#1 Single\" (2006)\t\t\t\tLos Angeles, California, USA\n");
        assert_eq!(
            parsed,
            Some(record("#1 Single", "2006", "Los Angeles, California, USA"))
        );
    }
}
