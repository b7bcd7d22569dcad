use crate::errors::{AppError, AppResult};
use crate::types::{
    month_name, region_name, CallRecord, MonthOption, RawRow, RegionOption, TimeBucket,
    NO_ATTENDANT, REGIONS,
};
use crate::util::{format_int, parse_i32_safe, parse_status, parse_timestamp};
use chrono::{Datelike, Timelike};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 4] = ["Tempo", "COB", "Status", "Teleatendente"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub unmapped_region_rows: usize,
}

/// Immutable call dataset plus the option lists used to populate filters.
///
/// Built once at startup; there is no way to mutate it afterwards, so every
/// recomputation starts from the complete set.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<CallRecord>,
    month_options: Vec<MonthOption>,
    region_options: Vec<RegionOption>,
    report: LoadReport,
}

impl RecordStore {
    pub fn from_records(records: Vec<CallRecord>) -> Self {
        let months: BTreeSet<u32> = records.iter().map(|r| r.month).collect();
        let month_options = months
            .into_iter()
            .map(|m| MonthOption {
                label: month_name(m),
                value: m,
            })
            .collect();
        let region_options = REGIONS
            .iter()
            .map(|&(code, name)| RegionOption {
                label: name,
                value: code,
            })
            .collect();
        let report = LoadReport {
            total_rows: records.len(),
            unmapped_region_rows: records.iter().filter(|r| r.region_name.is_none()).count(),
        };
        RecordStore {
            records,
            month_options,
            region_options,
            report,
        }
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    /// Months present in the data, ascending, with their localized names.
    pub fn month_options(&self) -> &[MonthOption] {
        &self.month_options
    }

    /// Every known region, in table order, whether or not it occurs in the data.
    pub fn region_options(&self) -> &[RegionOption] {
        &self.region_options
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a record with all derived fields.
pub fn derive_record(
    timestamp: chrono::NaiveDateTime,
    region_code: i32,
    status: crate::types::CallStatus,
    attendant: impl Into<String>,
) -> CallRecord {
    CallRecord {
        timestamp,
        region_code,
        status,
        attendant: attendant.into(),
        day: timestamp.day(),
        month: timestamp.month(),
        year: timestamp.year(),
        time_bucket: TimeBucket::from_hour(timestamp.hour()),
        region_name: region_name(region_code),
    }
}

pub fn load(path: impl AsRef<Path>) -> AppResult<RecordStore> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let store = load_from_reader(file)?;
    info!(
        path = %path.display(),
        "Loaded {} calls ({} months)",
        format_int(store.len()),
        store.month_options().len()
    );
    Ok(store)
}

/// Parse a call log. Any missing column or malformed value aborts the load.
pub fn load_from_reader<R: Read>(reader: R) -> AppResult<RecordStore> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(parse_row(&record, &headers)?);
    }

    let store = RecordStore::from_records(records);
    if store.report().unmapped_region_rows > 0 {
        warn!(
            "{} calls have a COB code outside the region table; they stay in the dataset \
             but belong to no chart series",
            format_int(store.report().unmapped_region_rows)
        );
    }
    Ok(store)
}

fn parse_row(record: &StringRecord, headers: &StringRecord) -> AppResult<CallRecord> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let parse_err = |message: String| AppError::Parse { line, message };

    let row: RawRow = record
        .deserialize(Some(headers))
        .map_err(|e| parse_err(e.to_string()))?;

    let timestamp = parse_timestamp(row.tempo.as_deref()).ok_or_else(|| {
        parse_err(format!(
            "invalid Tempo value {:?}",
            row.tempo.as_deref().unwrap_or("")
        ))
    })?;
    let region_code = parse_i32_safe(row.cob.as_deref()).ok_or_else(|| {
        parse_err(format!(
            "invalid COB value {:?}",
            row.cob.as_deref().unwrap_or("")
        ))
    })?;
    let status = parse_status(row.status.as_deref()).ok_or_else(|| {
        parse_err(format!(
            "invalid Status value {:?}",
            row.status.as_deref().unwrap_or("")
        ))
    })?;
    let attendant = match row.teleatendente {
        Some(a) if !a.trim().is_empty() => a.trim().to_string(),
        _ => NO_ATTENDANT.to_string(),
    };

    Ok(derive_record(timestamp, region_code, status, attendant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallStatus;

    const SAMPLE: &str = "\
Tempo,COB,Status,Teleatendente
2024-03-07 09:15:00,21,1,A1
2024-03-07 23:59:59,22,0,0
2024-01-02 00:00:00,99,1,A2
";

    #[test]
    fn derives_time_fields_and_region_names() {
        let store = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let records = store.records();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!((first.day, first.month, first.year), (7, 3, 2024));
        assert_eq!(first.time_bucket, TimeBucket::H08);
        assert_eq!(first.region_name, Some("2ºCOB - Uberlândia"));
        assert_eq!(first.status, CallStatus::Answered);

        assert_eq!(records[1].time_bucket, TimeBucket::H22);
        assert!(!records[1].has_attendant());
        assert_eq!(records[2].time_bucket, TimeBucket::H00);
    }

    #[test]
    fn unknown_region_is_retained_without_a_name() {
        let store = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let unknown = store
            .records()
            .iter()
            .find(|r| r.region_code == 99)
            .expect("region 99 kept");
        assert_eq!(unknown.region_name, None);
        assert_eq!(store.report().unmapped_region_rows, 1);
    }

    #[test]
    fn month_options_are_distinct_and_sorted() {
        let store = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let months: Vec<(u32, &str)> = store
            .month_options()
            .iter()
            .map(|o| (o.value, o.label))
            .collect();
        assert_eq!(months, vec![(1, "Janeiro"), (3, "Março")]);
    }

    #[test]
    fn region_options_always_list_the_whole_table() {
        let store = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let codes: Vec<i32> = store.region_options().iter().map(|o| o.value).collect();
        assert_eq!(codes, vec![21, 22, 31, 32, 4, 51, 52, 61]);
    }

    #[test]
    fn missing_time_column_is_fatal() {
        let csv = "COB,Status,Teleatendente\n21,1,A1\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn("Tempo")));
    }

    #[test]
    fn unparsable_time_is_fatal_and_reports_the_line() {
        let csv = "Tempo,COB,Status,Teleatendente\n2024-03-07 09:00,21,1,A1\nnot-a-date,21,1,A1\n";
        match load_from_reader(csv.as_bytes()) {
            Err(AppError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("Tempo"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn blank_attendant_means_no_attendant() {
        let csv = "Tempo,COB,Status,Teleatendente\n2024-03-07 09:00,21,1,\n";
        let store = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.records()[0].attendant, NO_ATTENDANT);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "Id,Tempo,COB,Status,Teleatendente,Obs\n7,2024-03-07 09:00,21,0,0,x\n";
        let store = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
