// The eight chart pipelines. Each one is a pure function of the filtered view;
// rows whose region code has no display name never form a series.
use crate::errors::{AppError, AppResult};
use crate::types::{
    BucketRegionCount, CallRecord, CallStatus, DailyRegionCount, Region, RegionShare,
    RelativeDelta, StatusRegionCount, TimeBucket, TopAttendant, TopRegion,
};
use crate::util::{average, relative_delta};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Chart 1: calls per calendar day and region, chronological.
pub fn calls_per_day(data: &[&CallRecord]) -> Vec<DailyRegionCount> {
    let mut map: HashMap<(NaiveDate, Region), u64> = HashMap::new();
    for r in data {
        if let Some(region) = r.region() {
            *map.entry((r.date(), region)).or_default() += 1;
        }
    }
    let mut rows: Vec<DailyRegionCount> = map
        .into_iter()
        .map(|((date, region), count)| DailyRegionCount {
            date,
            region: region.name.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.region.cmp(&b.region)));
    rows
}

/// Chart 2: answered and unanswered calls per region.
pub fn status_by_region(data: &[&CallRecord]) -> Vec<StatusRegionCount> {
    let mut map: HashMap<(Region, CallStatus), u64> = HashMap::new();
    for r in data {
        if let Some(region) = r.region() {
            *map.entry((region, r.status)).or_default() += 1;
        }
    }
    let mut rows: Vec<StatusRegionCount> = map
        .into_iter()
        .map(|((region, status), count)| StatusRegionCount {
            region: region.name.to_string(),
            status,
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.region.cmp(&b.region).then_with(|| a.status.cmp(&b.status)));
    rows
}

/// Chart 3: calls per two-hour bucket and region, in bucket order.
pub fn calls_per_bucket(data: &[&CallRecord]) -> Vec<BucketRegionCount> {
    let mut map: HashMap<(TimeBucket, Region), u64> = HashMap::new();
    for r in data {
        if let Some(region) = r.region() {
            *map.entry((r.time_bucket, region)).or_default() += 1;
        }
    }
    let mut rows: Vec<BucketRegionCount> = map
        .into_iter()
        .map(|((bucket, region), count)| BucketRegionCount {
            bucket,
            region: region.name.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.bucket.cmp(&b.bucket).then_with(|| a.region.cmp(&b.region)));
    rows
}

/// Chart 4: the same counts as chart 3, drawn as peaks per region.
pub fn bucket_trend(data: &[&CallRecord]) -> Vec<BucketRegionCount> {
    calls_per_bucket(data)
}

/// Chart 5: share of answered calls taken by each region.
pub fn answered_share(data: &[&CallRecord]) -> Vec<RegionShare> {
    let mut map: HashMap<Region, u64> = HashMap::new();
    for r in data.iter().filter(|r| r.status == CallStatus::Answered) {
        if let Some(region) = r.region() {
            *map.entry(region).or_default() += 1;
        }
    }
    let total: u64 = map.values().sum();
    let mut rows: Vec<RegionShare> = map
        .into_iter()
        .map(|(region, count)| RegionShare {
            region: region.name.to_string(),
            count,
            proportion: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect();
    rows.sort_by(|a, b| a.region.cmp(&b.region));
    rows
}

fn answered_by_attendant<'a>(data: &'a [&'a CallRecord]) -> impl Iterator<Item = &'a CallRecord> {
    data.iter()
        .copied()
        .filter(|r| r.status == CallStatus::Answered && r.has_attendant())
}

fn delta_against_mean(count: u64, counts: &[u64]) -> RelativeDelta {
    let reference = average(counts);
    RelativeDelta {
        reference,
        ratio: relative_delta(count as f64, reference),
    }
}

/// Chart 6: attendant with the most answered calls.
///
/// Groups by (attendant, region), so an attendant who worked for two regions
/// competes once per region. Ties go to the smallest attendant id, then the
/// smallest region name.
pub fn top_attendant(data: &[&CallRecord]) -> AppResult<TopAttendant> {
    let mut map: HashMap<(&str, Region), u64> = HashMap::new();
    for r in answered_by_attendant(data) {
        if let Some(region) = r.region() {
            *map.entry((r.attendant.as_str(), region)).or_default() += 1;
        }
    }
    let counts: Vec<u64> = map.values().copied().collect();
    let ((attendant, region), count) = map
        .into_iter()
        .max_by(|((a_id, a_reg), a_n), ((b_id, b_reg), b_n)| {
            a_n.cmp(b_n)
                .then_with(|| b_id.cmp(a_id))
                .then_with(|| b_reg.name.cmp(a_reg.name))
        })
        .ok_or(AppError::EmptyResult("top attendant"))?;

    Ok(TopAttendant {
        attendant: attendant.to_string(),
        region: region.name.to_string(),
        count,
        delta: delta_against_mean(count, &counts),
    })
}

fn top_region<'a, I>(rows: I, what: &'static str) -> AppResult<TopRegion>
where
    I: Iterator<Item = &'a CallRecord>,
{
    let mut map: HashMap<Region, u64> = HashMap::new();
    for r in rows {
        if let Some(region) = r.region() {
            *map.entry(region).or_default() += 1;
        }
    }
    let counts: Vec<u64> = map.values().copied().collect();
    let (region, count) = map
        .into_iter()
        .max_by(|(a_reg, a_n), (b_reg, b_n)| match a_n.cmp(b_n) {
            Ordering::Equal => b_reg.code.cmp(&a_reg.code),
            other => other,
        })
        .ok_or(AppError::EmptyResult(what))?;

    Ok(TopRegion {
        code: region.code,
        region: region.name.to_string(),
        count,
        delta: delta_against_mean(count, &counts),
    })
}

/// Chart 7: region with the most answered calls (attended calls only).
pub fn top_region_answered(data: &[&CallRecord]) -> AppResult<TopRegion> {
    top_region(answered_by_attendant(data), "top region by answered calls")
}

/// Chart 8: region with the most unanswered calls.
pub fn top_region_unanswered(data: &[&CallRecord]) -> AppResult<TopRegion> {
    top_region(
        data.iter()
            .copied()
            .filter(|r| r.status == CallStatus::NotAnswered),
        "top region by unanswered calls",
    )
}
