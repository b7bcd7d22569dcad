#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use cob_dashboard::{load_from_reader, RecordStore};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const HEADER: &str = "Tempo,COB,Status,Teleatendente";

/// The three-call example: two calls to Uberlândia at 09h (one answered by
/// A1, one missed) and one answered call to Uberaba at 15h.
pub const THREE_CALLS: &str = "\
Tempo,COB,Status,Teleatendente
2024-06-03 09:05:00,21,1,A1
2024-06-03 09:45:00,21,0,0
2024-06-04 15:20:00,22,1,A2
";

/// A couple of months across several regions, including an unmapped code.
pub const MIXED: &str = "\
Tempo,COB,Status,Teleatendente
2024-01-05 00:10:00,21,1,A1
2024-01-05 01:59:59,21,1,A1
2024-01-05 02:00:00,21,0,0
2024-01-06 08:30:00,22,1,B1
2024-01-06 23:59:00,22,0,0
2024-02-10 12:00:00,4,1,C1
2024-02-10 13:00:00,4,1,C2
2024-02-11 18:45:00,61,0,0
2024-02-11 19:00:00,99,1,Z9
2024-03-01 10:00:00,31,1,A1
";

pub fn store(csv: &str) -> RecordStore {
    load_from_reader(csv.as_bytes()).expect("fixture loads")
}

pub fn bin() -> Command {
    cargo_bin_cmd!("cob_dashboard")
}

/// Write `contents` to a fresh file in the system temp dir.
pub fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("{}_cob_dashboard.csv", name));
    fs::write(&path, contents).expect("write fixture csv");
    path
}

/// A temp directory path that does not exist yet.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("{}_cob_dashboard_out", name));
    fs::remove_dir_all(&path).ok();
    path
}
