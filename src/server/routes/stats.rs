use crate::error::ClinicDeskError;
use crate::server::router::ClinicDeskState;
use crate::stats::{BasicStats, DailyPatients, DistributionSlice, StatsAggregator};
use axum::{Json, extract::State};
use chrono::Local;

/// GET /api/stats
pub async fn basic_stats(
    State(state): State<ClinicDeskState>,
) -> Result<Json<BasicStats>, ClinicDeskError> {
    let today = Local::now().date_naive();
    Ok(Json(StatsAggregator::new(&state.db).basic(today).await?))
}

/// GET /api/patient-analytics
pub async fn patient_analytics(
    State(state): State<ClinicDeskState>,
) -> Result<Json<Vec<DailyPatients>>, ClinicDeskError> {
    Ok(Json(
        StatsAggregator::new(&state.db).patient_analytics().await?,
    ))
}

/// GET /api/hospital-distribution
pub async fn hospital_distribution(
    State(state): State<ClinicDeskState>,
) -> Result<Json<Vec<DistributionSlice>>, ClinicDeskError> {
    Ok(Json(
        StatsAggregator::new(&state.db)
            .hospital_distribution()
            .await?,
    ))
}
