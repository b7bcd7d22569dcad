use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tabled::Tabled;

/// Dispatch regions ("COB") in the order they are offered as filter options.
pub const REGIONS: [(i32, &str); 8] = [
    (21, "2ºCOB - Uberlândia"),
    (22, "2ºCOB - Uberaba"),
    (31, "3ºCOB - Juiz de Fora"),
    (32, "3ºCOB - Barbacena"),
    (4, "4ºCOB - Montes Claros"),
    (51, "5ºCOB - Governador Valadares"),
    (52, "5ºCOB - Ipatinga"),
    (61, "6ºCOB - Varginha"),
];

static REGION_INDEX: Lazy<HashMap<i32, &'static str>> =
    Lazy::new(|| REGIONS.iter().copied().collect());

/// Index 0 is the whole-year label; 1..=12 are calendar months.
pub const MONTH_NAMES: [&str; 13] = [
    "Ano Todo",
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn region_name(code: i32) -> Option<&'static str> {
    REGION_INDEX.get(&code).copied()
}

/// Localized month name, or an empty string outside `0..=12`.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("")
}

/// Raw CSV row. Everything is read as text so that the loader can report
/// which line and column failed to parse.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Tempo")]
    pub tempo: Option<String>,
    #[serde(rename = "COB")]
    pub cob: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Teleatendente")]
    pub teleatendente: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallStatus {
    NotAnswered = 0,
    Answered = 1,
}

impl CallStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            CallStatus::NotAnswered => "Não Atendido",
            CallStatus::Answered => "Atendido",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CallStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Two-hour slice of the day. The derived `Ord` is the axis order of the
/// charts, not the alphabetical order of the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBucket {
    H00,
    H02,
    H04,
    H06,
    H08,
    H10,
    H12,
    H14,
    H16,
    H18,
    H20,
    H22,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 12] = [
        TimeBucket::H00,
        TimeBucket::H02,
        TimeBucket::H04,
        TimeBucket::H06,
        TimeBucket::H08,
        TimeBucket::H10,
        TimeBucket::H12,
        TimeBucket::H14,
        TimeBucket::H16,
        TimeBucket::H18,
        TimeBucket::H20,
        TimeBucket::H22,
    ];

    /// Hours past 23 fall into the last bucket.
    pub fn from_hour(hour: u32) -> TimeBucket {
        let idx = (hour / 2).min(11) as usize;
        TimeBucket::ALL[idx]
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::H00 => "00:00-02:00",
            TimeBucket::H02 => "02:00-04:00",
            TimeBucket::H04 => "04:00-06:00",
            TimeBucket::H06 => "06:00-08:00",
            TimeBucket::H08 => "08:00-10:00",
            TimeBucket::H10 => "10:00-12:00",
            TimeBucket::H12 => "12:00-14:00",
            TimeBucket::H14 => "14:00-16:00",
            TimeBucket::H16 => "16:00-18:00",
            TimeBucket::H18 => "18:00-20:00",
            TimeBucket::H20 => "20:00-22:00",
            TimeBucket::H22 => "22:00-00:00",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Attendant id meaning "no attendant assigned".
pub const NO_ATTENDANT: &str = "0";

/// One phone call, with every derived field computed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub timestamp: NaiveDateTime,
    pub region_code: i32,
    pub status: CallStatus,
    pub attendant: String,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub time_bucket: TimeBucket,
    /// `None` when `region_code` is not in [`REGIONS`].
    pub region_name: Option<&'static str>,
}

impl CallRecord {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn has_attendant(&self) -> bool {
        self.attendant != NO_ATTENDANT
    }

    /// Named region, used as the grouping key of every chart series.
    pub fn region(&self) -> Option<Region> {
        self.region_name.map(|name| Region {
            code: self.region_code,
            name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub code: i32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct MonthOption {
    #[serde(rename = "label")]
    #[tabled(rename = "Mês")]
    pub label: &'static str,
    #[serde(rename = "value")]
    #[tabled(rename = "Valor")]
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct RegionOption {
    #[serde(rename = "label")]
    #[tabled(rename = "COB")]
    pub label: &'static str,
    #[serde(rename = "value")]
    #[tabled(rename = "Código")]
    pub value: i32,
}

// ---------------------------------------------------------------------------
// Chart rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct DailyRegionCount {
    #[serde(rename = "Dia")]
    #[tabled(rename = "Dia")]
    pub date: NaiveDate,
    #[serde(rename = "COB_nome")]
    #[tabled(rename = "Região (COB)")]
    pub region: String,
    #[serde(rename = "Quantidade")]
    #[tabled(rename = "Número de Chamadas")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct StatusRegionCount {
    #[serde(rename = "COB_nome")]
    #[tabled(rename = "Região (COB)")]
    pub region: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Atendimento")]
    pub status: CallStatus,
    #[serde(rename = "Quantidade")]
    #[tabled(rename = "Número de Chamadas")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct BucketRegionCount {
    #[serde(rename = "faixa_horaria")]
    #[tabled(rename = "Faixa Horária")]
    pub bucket: TimeBucket,
    #[serde(rename = "COB_nome")]
    #[tabled(rename = "Região (COB)")]
    pub region: String,
    #[serde(rename = "Quantidade")]
    #[tabled(rename = "Número de Chamadas")]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct RegionShare {
    #[serde(rename = "COB_nome")]
    #[tabled(rename = "Região (COB)")]
    pub region: String,
    #[serde(rename = "Quantidade")]
    #[tabled(rename = "Número de Chamadas")]
    pub count: u64,
    #[serde(rename = "Proporcao")]
    #[tabled(rename = "Proporção", display_with = "crate::util::display_ratio")]
    pub proportion: f64,
}

// ---------------------------------------------------------------------------
// Indicator summaries
// ---------------------------------------------------------------------------

/// `(value - mean) / mean`; `ratio` is `None` when the mean is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeDelta {
    pub reference: f64,
    pub ratio: Option<f64>,
}

impl Serialize for RelativeDelta {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("RelativeDelta", 3)?;
        st.serialize_field("reference", &self.reference)?;
        st.serialize_field("ratio", &self.ratio)?;
        st.serialize_field("display", &self.to_string())?;
        st.end()
    }
}

impl fmt::Display for RelativeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ratio {
            Some(r) => f.write_str(&crate::util::format_percent(r)),
            None => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct TopAttendant {
    #[tabled(rename = "Teleatendente")]
    pub attendant: String,
    #[tabled(rename = "COB")]
    pub region: String,
    #[tabled(rename = "Ligações atendidas")]
    pub count: u64,
    #[tabled(rename = "Em relação à média")]
    pub delta: RelativeDelta,
}

#[derive(Debug, Clone, Serialize, Tabled, PartialEq)]
pub struct TopRegion {
    #[tabled(rename = "Código")]
    pub code: i32,
    #[tabled(rename = "COB")]
    pub region: String,
    #[tabled(rename = "Ligações")]
    pub count: u64,
    #[tabled(rename = "Em relação à média")]
    pub delta: RelativeDelta,
}
