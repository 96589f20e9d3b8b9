// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsing of algorithm expiration dates.
//!
//! Formats use the tokens `yyyy`, `MM`, `dd`, `HH`, `mm` and `ss`; any other character is a
//! literal. A date may stop after any token of the format (`"2014"` under `yyyy-MM-dd`), and
//! missing components take the first instant of the period they leave open.

use crate::error::PolicyError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new("yyyy|MM|dd|HH|mm|ss").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "yyyy" => Some(Field::Year),
            "MM" => Some(Field::Month),
            "dd" => Some(Field::Day),
            "HH" => Some(Field::Hour),
            "mm" => Some(Field::Minute),
            "ss" => Some(Field::Second),
            _ => None,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Field::Year => r"(\d{4})",
            _ => r"(\d{1,2})",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(Field),
    Literal(String),
}

/// A validated date format.
#[derive(Debug, Clone)]
pub struct DateFormat {
    source: String,
    segments: Vec<Segment>,
}

impl DateFormat {
    pub fn new(format: &str) -> Result<Self, PolicyError> {
        let mut segments = Vec::new();
        let mut fields = Vec::new();
        let mut last = 0;
        for m in TOKEN.find_iter(format) {
            if m.start() > last {
                segments.push(Segment::Literal(format[last..m.start()].to_string()));
            }
            let field = Field::from_token(m.as_str())
                .ok_or_else(|| PolicyError::InvalidDateFormat(format.to_string()))?;
            if fields.contains(&field) {
                return Err(PolicyError::InvalidDateFormat(format.to_string()));
            }
            fields.push(field);
            segments.push(Segment::Field(field));
            last = m.end();
        }
        if last < format.len() {
            segments.push(Segment::Literal(format[last..].to_string()));
        }
        if !fields.contains(&Field::Year) {
            return Err(PolicyError::InvalidDateFormat(format.to_string()));
        }
        Ok(Self {
            source: format.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parses `value`, trying the full format first and then each shorter prefix ending on a token.
    pub fn parse(&self, value: &str) -> Result<DateTime<Utc>, PolicyError> {
        let value = value.trim();
        for end in (1..=self.segments.len()).rev() {
            let prefix = &self.segments[..end];
            if !matches!(prefix.last(), Some(Segment::Field(_))) {
                continue;
            }
            if let Some(date) = self.parse_prefix(prefix, value)? {
                return Ok(date);
            }
        }
        Err(self.invalid(value))
    }

    fn parse_prefix(&self, prefix: &[Segment], value: &str) -> Result<Option<DateTime<Utc>>, PolicyError> {
        let mut pattern = String::from("^");
        let mut order = Vec::new();
        for segment in prefix {
            match segment {
                Segment::Field(f) => {
                    pattern.push_str(f.pattern());
                    order.push(*f);
                }
                Segment::Literal(l) => pattern.push_str(&regex::escape(l)),
            }
        }
        pattern.push('$');
        let re = Regex::new(&pattern).map_err(|_| PolicyError::InvalidDateFormat(self.source.clone()))?;
        let Some(caps) = re.captures(value) else {
            return Ok(None);
        };

        let (mut year, mut month, mut day, mut hour, mut minute, mut second) = (None, 1, 1, 0, 0, 0);
        for (i, field) in order.iter().enumerate() {
            let n: u32 = caps
                .get(i + 1)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| self.invalid(value))?;
            match field {
                Field::Year => year = Some(n as i32),
                Field::Month => month = n,
                Field::Day => day = n,
                Field::Hour => hour = n,
                Field::Minute => minute = n,
                Field::Second => second = n,
            }
        }
        let Some(year) = year else {
            return Ok(None);
        };
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or_else(|| self.invalid(value))?;
        Ok(Some(Utc.from_utc_datetime(&naive)))
    }

    fn invalid(&self, value: &str) -> PolicyError {
        PolicyError::InvalidDate {
            value: value.to_string(),
            format: self.source.clone(),
        }
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            source: DEFAULT_DATE_FORMAT.to_string(),
            segments: vec![
                Segment::Field(Field::Year),
                Segment::Literal("-".to_string()),
                Segment::Field(Field::Month),
                Segment::Literal("-".to_string()),
                Segment::Field(Field::Day),
            ],
        }
    }
}

/// Parses `value` with `format`, or with [`DEFAULT_DATE_FORMAT`] when no format is given.
pub fn parse_policy_date(value: &str, format: Option<&str>) -> Result<DateTime<Utc>, PolicyError> {
    match format {
        Some(f) => DateFormat::new(f)?.parse(value),
        None => DateFormat::default().parse(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn year_only_format_returns_first_day() {
        assert_eq!(parse_policy_date("2014", Some("yyyy")).unwrap(), utc(2014, 1, 1));
    }

    #[test]
    fn default_format_accepts_truncated_dates() {
        assert_eq!(parse_policy_date("2014", None).unwrap(), utc(2014, 1, 1));
        assert_eq!(parse_policy_date("2014-07", None).unwrap(), utc(2014, 7, 1));
        assert_eq!(parse_policy_date("2012-08-01", None).unwrap(), utc(2012, 8, 1));
    }

    #[test]
    fn time_tokens_are_supported() {
        let parsed = parse_policy_date("01/08/2012 13:45:10", Some("dd/MM/yyyy HH:mm:ss")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2012, 8, 1, 13, 45, 10).unwrap());
    }

    #[test]
    fn format_without_year_is_rejected() {
        assert!(matches!(DateFormat::new("MM-dd"), Err(PolicyError::InvalidDateFormat(_))));
        assert!(matches!(DateFormat::new("yyyy-yyyy"), Err(PolicyError::InvalidDateFormat(_))));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(matches!(parse_policy_date("2014-02-30", None), Err(PolicyError::InvalidDate { .. })));
        assert!(matches!(parse_policy_date("next year", None), Err(PolicyError::InvalidDate { .. })));
    }
}
