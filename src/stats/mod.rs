//! Dashboard aggregates over clinics, patients and appointments.
//!
//! Counting runs in the store; the hospital distribution is shaped here from
//! the raw clinic locations.

use crate::db::DbActorHandle;
use crate::error::ClinicDeskError;
use ahash::AHashMap;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// `GET /api/stats` payload.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub total_hospitals: i64,
    pub patients_logged_in: i64,
    /// Distinct clinic `location` values.
    pub total_places: i64,
    pub todays_appointments: i64,
}

/// One `GET /api/patient-analytics` entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyPatients {
    /// `YYYY-MM-DD`
    pub day: String,
    pub new_patients: i64,
}

/// One `GET /api/hospital-distribution` entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DistributionSlice {
    /// City token of the clinic location.
    #[serde(rename = "type")]
    pub city: String,
    pub percentage: f64,
}

/// Read-only dashboard queries. Nothing is cached; every call hits the store.
pub struct StatsAggregator<'a> {
    db: &'a DbActorHandle,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(db: &'a DbActorHandle) -> Self {
        Self { db }
    }

    /// Counters for the dashboard header; `today` selects the appointments to count.
    pub async fn basic(&self, today: NaiveDate) -> Result<BasicStats, ClinicDeskError> {
        self.db.basic_stats(today).await
    }

    pub async fn patient_analytics(&self) -> Result<Vec<DailyPatients>, ClinicDeskError> {
        self.db.patient_analytics().await
    }

    pub async fn hospital_distribution(&self) -> Result<Vec<DistributionSlice>, ClinicDeskError> {
        let locations = self.db.clinic_locations().await?;
        Ok(hospital_distribution(locations))
    }
}

/// Text before the first comma of a location, trimmed.
pub fn city_of(location: &str) -> &str {
    location.split(',').next().unwrap_or_default().trim()
}

/// Groups locations by city and returns each city's share of all clinics,
/// largest first. Equal counts are ordered by city name.
pub fn hospital_distribution<I, S>(locations: I) -> Vec<DistributionSlice>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: AHashMap<String, u64> = AHashMap::new();
    for location in locations {
        *counts
            .entry(city_of(location.as_ref()).to_string())
            .or_default() += 1;
    }

    let mut groups: Vec<(String, u64)> = counts.into_iter().collect();
    groups.sort_by(|(a_city, a), (b_city, b)| b.cmp(a).then_with(|| a_city.cmp(b_city)));

    let total = groups.iter().map(|(_, n)| n).sum::<u64>().max(1);

    groups
        .into_iter()
        .map(|(city, n)| DistributionSlice {
            city,
            percentage: round2(n as f64 / total as f64 * 100.0),
        })
        .collect()
}

/// Two decimals, half-way cases to even (3.125 -> 3.12).
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
