//! Date extraction and canonicalization.

use chrono::NaiveDate;
use regex::Regex;
use tracing::trace;

use super::patterns::LONG_DATE;
use crate::error::DateError;

/// Long-form English date, e.g. "January 2, 2006".
///
/// Parsed strictly: full month name, single spaces and a four-digit year.
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// Canonical filename date form, e.g. "20060102".
pub const CANONICAL_DATE_FORMAT: &str = "%Y%m%d";

/// Extract a date from `text` using capture group 1 of `pattern`.
///
/// The captured text is tried against each of `formats` in order; an empty
/// list means [`DEFAULT_DATE_FORMAT`].
pub fn extract_date<S: AsRef<str>>(
    text: &str,
    pattern: &Regex,
    formats: &[S],
) -> Result<NaiveDate, DateError> {
    let caps = pattern.captures(text).ok_or(DateError::NotFound)?;
    let value = caps.get(1).ok_or(DateError::MissingCapture)?.as_str();
    parse_date(value, formats)
}

/// Like [`extract_date`] but compiles `pattern` first.
///
/// An invalid pattern is reported as [`DateError::InvalidPattern`] instead
/// of aborting.
pub fn extract_date_with<S: AsRef<str>>(
    text: &str,
    pattern: &str,
    formats: &[S],
) -> Result<NaiveDate, DateError> {
    let regex = Regex::new(pattern).map_err(|e| DateError::InvalidPattern(e.to_string()))?;
    extract_date(text, &regex, formats)
}

/// Parse a date string against candidate formats, first success wins.
pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Result<NaiveDate, DateError> {
    let value = value.trim();
    let formats: Vec<&str> = if formats.is_empty() {
        vec![DEFAULT_DATE_FORMAT]
    } else {
        formats.iter().map(|f| f.as_ref()).collect()
    };

    for format in &formats {
        let parsed = if *format == DEFAULT_DATE_FORMAT {
            parse_long_date(value)
        } else {
            NaiveDate::parse_from_str(value, format).map_err(|e| e.to_string())
        };

        match parsed {
            Ok(date) => return Ok(date),
            Err(e) => trace!("{:?} does not match {:?}: {}", value, format, e),
        }
    }

    Err(DateError::Unparseable {
        value: value.to_string(),
        formats: formats.into_iter().map(str::to_string).collect(),
    })
}

// chrono alone also takes abbreviated months, short years and loose spacing.
fn parse_long_date(value: &str) -> Result<NaiveDate, String> {
    let caps = LONG_DATE
        .captures(value)
        .ok_or_else(|| "not in \"Month D, YYYY\" form".to_string())?;

    let date = NaiveDate::parse_from_str(value, DEFAULT_DATE_FORMAT).map_err(|e| e.to_string())?;

    let month = &caps[1];
    if !date.format("%B").to_string().eq_ignore_ascii_case(month) {
        return Err(format!("{:?} is not a full month name", month));
    }

    Ok(date)
}

/// Format a date as `YYYYMMDD`.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NO_FORMATS: &[&str] = &[];

    fn long_date_regex() -> Regex {
        Regex::new(r"([A-Za-z]+ \d{1,2}, \d{4})").unwrap()
    }

    #[test]
    fn test_canonicalize_long_date() {
        let date = extract_date("Invoice date: January 2, 2006", &long_date_regex(), NO_FORMATS)
            .unwrap();
        assert_eq!(canonical_date(date), "20060102");
    }

    #[test]
    fn test_single_digit_day_is_zero_padded() {
        let date = extract_date_with("Date: March 5, 2023", r"Date: (.+)", NO_FORMATS).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 5).unwrap());
        assert_eq!(canonical_date(date), "20230305");
    }

    #[test]
    fn test_two_digit_day() {
        let date = extract_date("December 31, 1999", &long_date_regex(), NO_FORMATS).unwrap();
        assert_eq!(canonical_date(date), "19991231");
    }

    #[test]
    fn test_pattern_not_found() {
        let err = extract_date("no dates here", &long_date_regex(), NO_FORMATS).unwrap_err();
        assert_eq!(err, DateError::NotFound);
    }

    #[test]
    fn test_optional_group_not_captured() {
        let regex = Regex::new(r"Date:(?: ([A-Za-z]+ \d{1,2}, \d{4}))?").unwrap();
        let err = extract_date("Date: pending", &regex, NO_FORMATS).unwrap_err();
        assert_eq!(err, DateError::MissingCapture);
    }

    #[test]
    fn test_pattern_without_group() {
        let err = extract_date_with("Date: March 5, 2023", r"Date: \w+", NO_FORMATS).unwrap_err();
        assert_eq!(err, DateError::MissingCapture);
    }

    #[test]
    fn test_wrong_format_is_unparseable() {
        let err = extract_date_with("Date: 5 March 2023", r"Date: (.+)", NO_FORMATS).unwrap_err();
        assert_eq!(
            err,
            DateError::Unparseable {
                value: "5 March 2023".to_string(),
                formats: vec![DEFAULT_DATE_FORMAT.to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_month_name() {
        let err = extract_date("Smarch 5, 2023", &long_date_regex(), NO_FORMATS).unwrap_err();
        assert!(matches!(err, DateError::Unparseable { .. }));
    }

    #[test]
    fn test_impossible_day() {
        let err = extract_date("February 30, 2023", &long_date_regex(), NO_FORMATS).unwrap_err();
        assert!(matches!(err, DateError::Unparseable { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_not_fatal() {
        let err = extract_date_with("Date: March 5, 2023", r"Date: ([", NO_FORMATS).unwrap_err();
        assert!(matches!(err, DateError::InvalidPattern(_)));
    }

    #[test]
    fn test_candidate_formats_in_order() {
        let formats = ["%B %d, %Y", "%d.%m.%Y", "%Y-%m-%d"];

        let date = extract_date_with("Issued 2024-01-15", r"Issued (\S+)", &formats).unwrap();
        assert_eq!(canonical_date(date), "20240115");

        let date = extract_date_with("Issued 15.01.2024", r"Issued (\S+)", &formats).unwrap();
        assert_eq!(canonical_date(date), "20240115");
    }

    #[test]
    fn test_two_digit_year_is_rejected() {
        let err = extract_date_with("Date: March 5, 23", r"Date: (.+)", NO_FORMATS).unwrap_err();
        assert!(matches!(err, DateError::Unparseable { .. }));
    }

    #[test]
    fn test_long_date_phrasing_is_strict() {
        for value in [
            "Mar 5, 2023",
            "March5, 2023",
            "March 5,2023",
            "March  5, 2023",
            "March 5, 0999x",
            "March 123, 2023",
            "March 5, 20231",
        ] {
            assert!(parse_date(value, NO_FORMATS).is_err(), "{:?} should be rejected", value);
        }
    }

    #[test]
    fn test_long_date_accepted_variants() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(parse_date("march 5, 2023", NO_FORMATS).unwrap(), expected);
        assert_eq!(parse_date("March 05, 2023", NO_FORMATS).unwrap(), expected);
        assert_eq!(parse_date(" March 5, 2023 ", NO_FORMATS).unwrap(), expected);
    }

    #[test]
    fn test_custom_formats_keep_chrono_behaviour() {
        let date = parse_date("Mar 5, 2023", &["%b %d, %Y"]).unwrap();
        assert_eq!(canonical_date(date), "20230305");
    }

    #[test]
    fn test_first_match_in_text_is_used() {
        let text = "Date: May 1, 2020\nDate: June 2, 2021";
        let date = extract_date_with(text, r"Date: ([A-Za-z]+ \d{1,2}, \d{4})", NO_FORMATS)
            .unwrap();
        assert_eq!(canonical_date(date), "20200501");
    }
}
