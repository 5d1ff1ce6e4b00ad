use chrono::{DateTime, Local, TimeZone};

use crate::models::ResultRecord;

/// Timestamp layout used in the text export. Round-trips through
/// `DateTime::parse_from_str` with the same format string.
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Append-only history of completed rounds.
#[derive(Debug, Clone, Default)]
pub struct ResultsLedger {
    records: Vec<ResultRecord>,
}

impl ResultsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> Vec<ResultRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Human-readable export, timestamps in the local zone.
    pub fn export(&self) -> String {
        self.export_in(&Local)
    }

    /// Same as [`export`](Self::export) with an explicit time zone.
    pub fn export_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut out = String::new();

        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let local: DateTime<Tz> = record.timestamp.with_timezone(tz);

            if record.title.is_empty() {
                out.push_str(&format!("Round {}\n", i + 1));
            } else {
                out.push_str(&format!("Round {}: {}\n", i + 1, record.title));
            }
            out.push_str(&format!("Time: {}\n", local.format(EXPORT_TIME_FORMAT)));
            out.push_str(&format!("Winners: {}\n", record.winners.join(", ")));
        }

        out
    }

    /// The ledger as a JSON array of records.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}
