//! Recomputation entry point.
//!
//! A filter or toggle change maps to one call of [`recompute`]: filter the
//! store once, run the eight pipelines in order, and hand every chart back
//! together. Nothing is cached between calls.

use crate::errors::{AppError, AppResult};
use crate::filter::{filter, Selection};
use crate::loader::RecordStore;
use crate::reports;
use crate::types::{
    BucketRegionCount, DailyRegionCount, RegionShare, StatusRegionCount, TopAttendant, TopRegion,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Light/dark switch. Only selects a template name; data is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn template(self) -> &'static str {
        match self {
            Theme::Light => "flatly",
            Theme::Dark => "darkly",
        }
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "flatly" | "true" | "1" => Ok(Theme::Light),
            "dark" | "darkly" | "false" | "0" => Ok(Theme::Dark),
            other => Err(AppError::InvalidTheme(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Indicator,
}

/// One chart as handed to the presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Chart<T> {
    pub id: &'static str,
    pub kind: ChartKind,
    pub title: &'static str,
    pub template: &'static str,
    pub show_legend: bool,
    pub data: T,
}

/// Result of a "top" pipeline: either the winner or an explicit no-data state.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Summary<T> {
    Value(T),
    NoData,
}

impl<T> Summary<T> {
    fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(v) => Summary::Value(v),
            Err(e) => {
                warn!("{}", e);
                Summary::NoData
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Summary::Value(v) => Some(v),
            Summary::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Summary::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardQuery {
    pub months: Selection<u32>,
    pub regions: Selection<i32>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_legend", rename = "legend")]
    pub show_legend: bool,
}

fn default_legend() -> bool {
    true
}

impl DashboardQuery {
    /// What the dashboard shows on first load: every month option and every
    /// region option ticked.
    pub fn initial(store: &RecordStore) -> Self {
        DashboardQuery {
            months: Selection::only(store.month_options().iter().map(|o| o.value)),
            regions: Selection::only(store.region_options().iter().map(|o| o.value)),
            theme: Theme::default(),
            show_legend: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub theme: Theme,
    pub show_legend: bool,
    pub filtered_calls: usize,
    pub calls_per_day: Chart<Vec<DailyRegionCount>>,
    pub status_by_region: Chart<Vec<StatusRegionCount>>,
    pub calls_per_bucket: Chart<Vec<BucketRegionCount>>,
    pub bucket_trend: Chart<Vec<BucketRegionCount>>,
    pub answered_share: Chart<Vec<RegionShare>>,
    pub top_attendant: Chart<Summary<TopAttendant>>,
    pub top_region_answered: Chart<Summary<TopRegion>>,
    pub top_region_unanswered: Chart<Summary<TopRegion>>,
}

pub fn recompute(store: &RecordStore, query: &DashboardQuery) -> Dashboard {
    let view = filter(store.records(), &query.months, &query.regions);
    debug!(
        filtered = view.len(),
        total = store.len(),
        theme = ?query.theme,
        "recomputing dashboard"
    );

    let template = query.theme.template();
    let show_legend = query.show_legend;
    let chart = |id: &'static str, kind: ChartKind, title: &'static str| ChartFrame {
        id,
        kind,
        title,
        template,
        show_legend,
    };

    Dashboard {
        theme: query.theme,
        show_legend,
        filtered_calls: view.len(),
        calls_per_day: chart("graph1", ChartKind::Bar, "Quantidade de Ligações por Dia")
            .with(reports::calls_per_day(&view)),
        status_by_region: chart(
            "graph2",
            ChartKind::Bar,
            "Ligações Atendidas e Não Atendidas por COB",
        )
        .with(reports::status_by_region(&view)),
        calls_per_bucket: chart("graph3", ChartKind::Bar, "Ligações por Faixa Horária e COB")
            .with(reports::calls_per_bucket(&view)),
        bucket_trend: chart(
            "graph4",
            ChartKind::Line,
            "Picos de Ligações por Faixa Horária e COB",
        )
        .with(reports::bucket_trend(&view)),
        answered_share: chart(
            "graph5",
            ChartKind::Pie,
            "Distribuição de ligações atendidas por COB (Região)",
        )
        .with(reports::answered_share(&view)),
        top_attendant: chart("graph6", ChartKind::Indicator, "Top Atendente")
            .with(Summary::from_result(reports::top_attendant(&view))),
        top_region_answered: chart(
            "graph7",
            ChartKind::Indicator,
            "Região com mais ligações atendidas",
        )
        .with(Summary::from_result(reports::top_region_answered(&view))),
        top_region_unanswered: chart(
            "graph8",
            ChartKind::Indicator,
            "Região com mais ligações não atendidas",
        )
        .with(Summary::from_result(reports::top_region_unanswered(&view))),
    }
}

struct ChartFrame {
    id: &'static str,
    kind: ChartKind,
    title: &'static str,
    template: &'static str,
    show_legend: bool,
}

impl ChartFrame {
    fn with<T>(self, data: T) -> Chart<T> {
        Chart {
            id: self.id,
            kind: self.kind,
            title: self.title,
            template: self.template,
            show_legend: self.show_legend,
            data,
        }
    }
}
