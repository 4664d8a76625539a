//! Validated request parameters shared by the services and upstream clients.

use crate::error::{AppError, Result};

// == Stock History Period ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
}

impl Period {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "1H" => Ok(Period::OneHour),
            "1D" => Ok(Period::OneDay),
            "1W" => Ok(Period::OneWeek),
            "1M" => Ok(Period::OneMonth),
            "3M" => Ok(Period::ThreeMonths),
            "1Y" => Ok(Period::OneYear),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid period '{}'. Use one of 1H, 1D, 1W, 1M, 3M, 1Y",
                raw
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneHour => "1H",
            Period::OneDay => "1D",
            Period::OneWeek => "1W",
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::OneYear => "1Y",
        }
    }

    /// Candle width in Finnhub's resolution vocabulary.
    pub fn resolution(&self) -> &'static str {
        match self {
            Period::OneHour => "1",
            Period::OneDay => "5",
            Period::OneWeek => "60",
            Period::OneMonth | Period::ThreeMonths => "D",
            Period::OneYear => "W",
        }
    }

    /// Length of the window ending now.
    pub fn span(&self) -> chrono::Duration {
        match self {
            Period::OneHour => chrono::Duration::hours(1),
            Period::OneDay => chrono::Duration::days(1),
            Period::OneWeek => chrono::Duration::days(7),
            Period::OneMonth => chrono::Duration::days(30),
            Period::ThreeMonths => chrono::Duration::days(90),
            Period::OneYear => chrono::Duration::days(365),
        }
    }
}

// == Temperature Units ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Accepts the dashboard's `C`/`F` as well as the provider's own names.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "metric" => Ok(Units::Metric),
            "f" | "imperial" => Ok(Units::Imperial),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid unit '{}'. Use C or F",
                raw
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

// == News Topic ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    General,
    Business,
    Technology,
    Sports,
    Entertainment,
    Health,
    Science,
}

impl Topic {
    /// Unknown categories fall back to general news; blank ones are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let topic = match raw.trim().to_ascii_lowercase().as_str() {
            "" => {
                return Err(AppError::InvalidInput(
                    "Category cannot be empty".to_string(),
                ))
            }
            "business" => Topic::Business,
            "technology" => Topic::Technology,
            "sports" => Topic::Sports,
            "entertainment" => Topic::Entertainment,
            "health" => Topic::Health,
            "science" => Topic::Science,
            _ => Topic::General,
        };
        Ok(topic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::Business => "business",
            Topic::Technology => "technology",
            Topic::Sports => "sports",
            Topic::Entertainment => "entertainment",
            Topic::Health => "health",
            Topic::Science => "science",
        }
    }
}

// == Text Helpers ==
/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
///
/// `"san FRANCISCO"` becomes `"San Francisco"`, `"light rain"` becomes `"Light Rain"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for c in raw.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("1d").unwrap(), Period::OneDay);
        assert_eq!(Period::parse(" 3M ").unwrap(), Period::ThreeMonths);
        assert!(matches!(Period::parse("2Y"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_period_tables() {
        assert_eq!(Period::OneWeek.resolution(), "60");
        assert_eq!(Period::OneYear.span(), chrono::Duration::days(365));
        assert_eq!(Period::OneHour.label(), "1H");
    }

    #[test]
    fn test_units_parse() {
        assert_eq!(Units::parse("C").unwrap(), Units::Metric);
        assert_eq!(Units::parse("f").unwrap(), Units::Imperial);
        assert_eq!(Units::parse("imperial").unwrap(), Units::Imperial);
        assert!(Units::parse("K").is_err());
    }

    #[test]
    fn test_topic_parse() {
        assert_eq!(Topic::parse("Technology").unwrap(), Topic::Technology);
        assert_eq!(Topic::parse("crypto").unwrap(), Topic::General);
        assert!(Topic::parse("  ").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("san FRANCISCO"), "San Francisco");
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("saint-étienne"), "Saint-Étienne");
        assert_eq!(title_case(""), "");
    }
}
