//! Compiled patterns shared by the validators.

use regex::Regex;
use std::sync::OnceLock;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| Regex::new($re).expect(concat!(stringify!($name), " pattern compiles")))
        }
    };
}

pattern!(slug, r"^[-a-zA-Z0-9_]+$");

pattern!(decimal_tail, r"\.0*\s*$");

pattern!(
    iso_datetime,
    r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})[T ](?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:[.,](?P<micro>\d{1,6})\d{0,6})?)?\s*(?P<tz>Z|[+-]\d{2}(?::?\d{2})?)?$"
);

pattern!(iso_date, r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$");

pattern!(
    iso_time,
    r"^(?P<hour>\d{1,2}):(?P<minute>\d{1,2})(?::(?P<second>\d{1,2})(?:[.,](?P<micro>\d{1,6})\d{0,6})?)?$"
);

pattern!(
    standard_duration,
    r"^(?:(?P<days>-?\d+) (?:days?, )?)?(?P<sign>-?)(?:(?P<hours>\d+):(?P<hminutes>\d+):|(?P<minutes>\d+):)?(?P<seconds>\d+)(?:[.,](?P<micro>\d{1,6})\d{0,6})?$"
);

pattern!(
    iso_duration,
    r"^(?P<sign>[-+]?)P(?:(?P<days>\d+(?:[.,]\d+)?)D)?(?:T(?:(?P<hours>\d+(?:[.,]\d+)?)H)?(?:(?P<minutes>\d+(?:[.,]\d+)?)M)?(?:(?P<seconds>\d+(?:[.,]\d+)?)S)?)?$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(slug().is_match("a-b_c1"));
        assert!(!slug().is_match("a b"));
        assert!(iso_datetime().is_match("2019-04-03T10:10"));
        assert!(iso_date().is_match("2019-04-03"));
        assert!(iso_time().is_match("10:10:05.123"));
        assert!(standard_duration().is_match("3 10:00:00"));
        assert!(iso_duration().is_match("P3DT4H"));
    }

    #[test]
    fn test_decimal_tail() {
        assert_eq!(decimal_tail().replace("5.000", ""), "5");
        assert_eq!(decimal_tail().replace("5.5", ""), "5.5");
    }
}
