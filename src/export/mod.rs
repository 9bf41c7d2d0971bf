// CSV export of stored ballots for the analytics team.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Result, SurveyError};
use crate::models::VoteRecord;
use crate::thai_time;

/// Byte order mark so spreadsheet tools pick UTF-8.
const BOM: &str = "\u{FEFF}";

pub const HEADERS: [&str; 10] = [
    "Timestamp",
    "Province",
    "District",
    "Subdistrict",
    "Zipcode",
    "Region",
    "Policy Rank 1",
    "Policy Rank 2",
    "Policy Rank 3",
    "Additional Comment",
];

/// Serializes `votes` in the given order. Every data field is quoted and
/// embedded quotes are doubled.
pub fn votes_to_csv(votes: &[VoteRecord]) -> Result<Vec<u8>> {
    if votes.is_empty() {
        return Err(SurveyError::NothingToExport);
    }

    let mut out = Vec::new();
    out.extend_from_slice(BOM.as_bytes());
    out.extend_from_slice(HEADERS.join(",").as_bytes());
    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for vote in votes {
        let timestamp = vote.created_at.map(thai_time::date_time).unwrap_or_default();
        writer.write_record([
            timestamp.as_str(),
            vote.location.province.as_str(),
            vote.location.district.as_str(),
            vote.location.subdistrict.as_str(),
            vote.location.zipcode.as_str(),
            vote.location.region.as_deref().unwrap_or(""),
            vote.title_at_rank(1).unwrap_or(""),
            vote.title_at_rank(2).unwrap_or(""),
            vote.title_at_rank(3).unwrap_or(""),
            vote.comment.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| SurveyError::Io(e.into_error()))
}

/// `survey_data_<filter>_<yyyy-mm-dd>.csv`
pub fn file_name(filter_label: &str, today: NaiveDate) -> String {
    let label: String = filter_label
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    format!("survey_data_{}_{}.csv", label, today.format("%Y-%m-%d"))
}
