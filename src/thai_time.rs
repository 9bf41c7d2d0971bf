//! Timestamp rendering in Thai local time with Buddhist-era years.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

const BUDDHIST_ERA_OFFSET: i32 = 543;
const BANGKOK_OFFSET_SECONDS: i32 = 7 * 3600;

pub const NOT_AVAILABLE: &str = "N/A";

fn to_bangkok(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    // A +07:00 offset is always in range.
    let offset = FixedOffset::east_opt(BANGKOK_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
    at.with_timezone(&offset)
}

/// `19/10/2569`
pub fn date(at: DateTime<Utc>) -> String {
    let local = to_bangkok(at);
    format!(
        "{}/{}/{}",
        local.day(),
        local.month(),
        local.year() + BUDDHIST_ERA_OFFSET
    )
}

/// `20:05`
pub fn time(at: DateTime<Utc>) -> String {
    to_bangkok(at).format("%H:%M").to_string()
}

/// `19/10/2569 20:05:09`
pub fn date_time(at: DateTime<Utc>) -> String {
    let local = to_bangkok(at);
    format!("{} {}", date(at), local.format("%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_bangkok_time_with_buddhist_year() {
        let at = Utc.with_ymd_and_hms(2026, 1, 31, 18, 5, 9).unwrap();
        // 01:05 the next day in Bangkok
        assert_eq!(date(at), "1/2/2569");
        assert_eq!(time(at), "01:05");
        assert_eq!(date_time(at), "1/2/2569 01:05:09");
    }
}
