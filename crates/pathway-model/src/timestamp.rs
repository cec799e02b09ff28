//! Generation timestamps of report snapshots

use chrono::{DateTime, FixedOffset, NaiveDateTime, SubsecRound, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NAIVE_SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// How a timestamp was written
///
/// Two timestamps naming the same instant in different layouts are distinct
/// values; rendering reproduces the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampLayout {
    /// Character between date and time (`T`, `t` or a space)
    pub separator: char,
    /// Number of fractional-second digits, `None` when absent
    pub fraction_digits: Option<u8>,
    /// Offset written as `Z` rather than `+00:00`
    pub zulu: bool,
}

impl Default for TimestampLayout {
    fn default() -> Self {
        Self {
            separator: 'T',
            fraction_digits: None,
            zulu: false,
        }
    }
}

impl TimestampLayout {
    fn detect(text: &str) -> Self {
        let separator = text.chars().nth(10).unwrap_or('T');
        let fraction_digits = text
            .get(19..)
            .and_then(|rest| rest.strip_prefix('.'))
            .map(|digits| {
                let count = digits.bytes().take_while(u8::is_ascii_digit).count().min(9);
                u8::try_from(count).unwrap_or(9)
            });
        let zulu = text.ends_with('Z') || text.ends_with('z');
        Self {
            separator,
            fraction_digits,
            zulu,
        }
    }

    fn write_naive(self, f: &mut Formatter<'_>, naive: &NaiveDateTime) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            naive.format("%Y-%m-%d"),
            self.separator,
            naive.format("%H:%M:%S")
        )?;
        if let Some(digits) = self.fraction_digits {
            // Leap-second nanos are folded back into the 0..1e9 range
            let nanos = format!("{:09}", naive.nanosecond() % 1_000_000_000);
            write!(f, ".{}", &nanos[..usize::from(digits)])?;
        }
        Ok(())
    }
}

/// ISO 8601 generation time of a snapshot
///
/// Report generators write either an offset-aware timestamp
/// (`2025-01-12T10:23:45+00:00`) or a local naive one
/// (`2025-01-12T10:23:45.123456`). Both keep the layout they were written
/// in so rendering reproduces the header byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeneratedAt {
    /// Timestamp carrying a UTC offset
    Zoned(DateTime<FixedOffset>, TimestampLayout),
    /// Timestamp without offset information
    Naive(NaiveDateTime, TimestampLayout),
}

impl GeneratedAt {
    /// Current time in UTC, to the microsecond
    #[must_use]
    pub fn now() -> Self {
        let layout = TimestampLayout {
            fraction_digits: Some(6),
            ..TimestampLayout::default()
        };
        Self::Zoned(Utc::now().trunc_subsecs(6).fixed_offset(), layout)
    }

    /// Instant used for ordering; naive timestamps are read as UTC
    #[must_use]
    pub fn as_utc(&self) -> DateTime<Utc> {
        match self {
            Self::Zoned(dt, _) => dt.with_timezone(&Utc),
            Self::Naive(naive, _) => Utc.from_utc_datetime(naive),
        }
    }

    /// Layout the timestamp renders with
    #[must_use]
    pub fn layout(&self) -> TimestampLayout {
        match self {
            Self::Zoned(_, layout) | Self::Naive(_, layout) => *layout,
        }
    }
}

impl Ord for GeneratedAt {
    fn cmp(&self, other: &Self) -> Ordering {
        // Same instant: naive sorts before zoned, zoned by offset, then layout
        let rank = |ts: &Self| match ts {
            Self::Naive(..) => (0, 0),
            Self::Zoned(dt, _) => (1, dt.offset().local_minus_utc()),
        };
        self.as_utc()
            .cmp(&other.as_utc())
            .then_with(|| rank(self).cmp(&rank(other)))
            .then_with(|| self.layout().cmp(&other.layout()))
    }
}

impl PartialOrd for GeneratedAt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for GeneratedAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive(naive, layout) => layout.write_naive(f, naive),
            Self::Zoned(dt, layout) => {
                layout.write_naive(f, &dt.naive_local())?;
                if layout.zulu && dt.offset().local_minus_utc() == 0 {
                    f.write_str("Z")
                } else {
                    write!(f, "{}", dt.format("%:z"))
                }
            }
        }
    }
}

impl FromStr for GeneratedAt {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let layout = TimestampLayout::detect(s);
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Zoned(dt, layout));
        }
        NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, NAIVE_SPACED_FORMAT))
            .map(|naive| Self::Naive(naive, layout))
            .map_err(|e| ModelError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl TryFrom<String> for GeneratedAt {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeneratedAt> for String {
    fn from(value: GeneratedAt) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &str) -> String {
        text.parse::<GeneratedAt>().unwrap().to_string()
    }

    #[test]
    fn parses_naive_with_micros() {
        let ts: GeneratedAt = "2025-01-12T10:23:45.123456".parse().unwrap();
        assert!(matches!(ts, GeneratedAt::Naive(..)));
        assert_eq!(ts.to_string(), "2025-01-12T10:23:45.123456");
    }

    #[test]
    fn parses_naive_without_fraction() {
        assert_eq!(rendered("2025-01-12T10:23:45"), "2025-01-12T10:23:45");
    }

    #[test]
    fn parses_zoned() {
        let ts: GeneratedAt = "2025-01-12T10:23:45+02:00".parse().unwrap();
        assert!(matches!(ts, GeneratedAt::Zoned(..)));
        assert_eq!(ts.to_string(), "2025-01-12T10:23:45+02:00");
    }

    #[test]
    fn keeps_the_written_layout() {
        for text in [
            "2025-01-12T10:23:45.120000",
            "2025-01-12T10:23:45.100",
            "2025-01-12T10:23:45.000000000",
            "2025-01-12 10:23:45",
            "2025-01-12 10:23:45.5",
            "2025-01-12T10:23:45Z",
            "2025-01-12T10:23:45.120Z",
            "2025-01-12T10:23:45+00:00",
            "2025-01-12T10:23:45.120000-05:30",
        ] {
            assert_eq!(rendered(text), text);
        }
    }

    #[test]
    fn same_instant_in_different_layouts_is_distinct_but_ordered() {
        let short: GeneratedAt = "2025-01-12T10:23:45.12".parse().unwrap();
        let long: GeneratedAt = "2025-01-12T10:23:45.120000".parse().unwrap();
        assert_ne!(short, long);
        assert_eq!(short.as_utc(), long.as_utc());
        assert_ne!(short.cmp(&long), Ordering::Equal);
    }

    #[test]
    fn now_renders_and_parses_back() {
        let now = GeneratedAt::now();
        let back: GeneratedAt = now.to_string().parse().unwrap();
        assert_eq!(back, now);
    }

    #[test]
    fn orders_across_forms() {
        let naive: GeneratedAt = "2025-01-12T10:00:00".parse().unwrap();
        let zoned: GeneratedAt = "2025-01-12T11:30:00+02:00".parse().unwrap();
        // 11:30+02:00 is 09:30 UTC
        assert!(zoned < naive);
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<GeneratedAt, _> = "yesterday".parse();
        assert!(matches!(result, Err(ModelError::InvalidTimestamp { .. })));
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let ts: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-01-12T10:23:45\"");
        let back: GeneratedAt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
