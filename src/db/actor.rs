use crate::db::models::{ClinicCreate, DbClinic};
use crate::db::schema::SQLITE_INIT;
use crate::error::ClinicDeskError;
use crate::stats::{BasicStats, DailyPatients};
use chrono::{NaiveDate, Utc};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a clinic and return its generated id.
    CreateClinic(ClinicCreate, RpcReplyPort<Result<String, ClinicDeskError>>),

    /// Whether any clinic already uses this username.
    UsernameExists(String, RpcReplyPort<Result<bool, ClinicDeskError>>),

    /// List every clinic (without password hashes).
    ListClinics(RpcReplyPort<Result<Vec<DbClinic>, ClinicDeskError>>),

    /// Headline counters; appointments are matched against the given day.
    BasicStats(NaiveDate, RpcReplyPort<Result<BasicStats, ClinicDeskError>>),

    /// New patients per calendar day, ascending.
    PatientAnalytics(RpcReplyPort<Result<Vec<DailyPatients>, ClinicDeskError>>),

    /// Raw `location` of every clinic.
    ClinicLocations(RpcReplyPort<Result<Vec<String>, ClinicDeskError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn create_clinic(&self, create: ClinicCreate) -> Result<String, ClinicDeskError> {
        ractor::call!(self.actor, DbActorMessage::CreateClinic, create).map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor CreateClinic RPC failed: {e}"))
        })?
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, ClinicDeskError> {
        ractor::call!(
            self.actor,
            DbActorMessage::UsernameExists,
            username.to_string()
        )
        .map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor UsernameExists RPC failed: {e}"))
        })?
    }

    pub async fn list_clinics(&self) -> Result<Vec<DbClinic>, ClinicDeskError> {
        ractor::call!(self.actor, DbActorMessage::ListClinics).map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor ListClinics RPC failed: {e}"))
        })?
    }

    pub async fn basic_stats(&self, today: NaiveDate) -> Result<BasicStats, ClinicDeskError> {
        ractor::call!(self.actor, DbActorMessage::BasicStats, today).map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor BasicStats RPC failed: {e}"))
        })?
    }

    pub async fn patient_analytics(&self) -> Result<Vec<DailyPatients>, ClinicDeskError> {
        ractor::call!(self.actor, DbActorMessage::PatientAnalytics).map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor PatientAnalytics RPC failed: {e}"))
        })?
    }

    pub async fn clinic_locations(&self) -> Result<Vec<String>, ClinicDeskError> {
        ractor::call!(self.actor, DbActorMessage::ClinicLocations).map_err(|e| {
            ClinicDeskError::RactorError(format!("DbActor ClinicLocations RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::CreateClinic(create, reply) => {
                let res = self.create_clinic(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::UsernameExists(username, reply) => {
                let res = self.username_exists(&state.pool, &username).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListClinics(reply) => {
                let res = self.list_clinics(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::BasicStats(today, reply) => {
                let res = self.basic_stats(&state.pool, today).await;
                let _ = reply.send(res);
            }
            DbActorMessage::PatientAnalytics(reply) => {
                let res = self.patient_analytics(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ClinicLocations(reply) => {
                let res = self.clinic_locations(&state.pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_clinic(
        &self,
        pool: &SqlitePool,
        create: ClinicCreate,
    ) -> Result<String, ClinicDeskError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // A concurrent insert with the same username loses on the unique index and
        // comes back as `UsernameTaken` via `From<sqlx::Error>`.
        sqlx::query(
            r#"
        INSERT INTO clinics (
            id, name, identifier, location, status, image_url, username, password, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(&id)
        .bind(create.name)
        .bind(create.identifier)
        .bind(create.location)
        .bind(create.status)
        .bind(create.image_url)
        .bind(create.username)
        .bind(create.password)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(id)
    }

    async fn username_exists(
        &self,
        pool: &SqlitePool,
        username: &str,
    ) -> Result<bool, ClinicDeskError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clinics WHERE username = ?)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    async fn list_clinics(&self, pool: &SqlitePool) -> Result<Vec<DbClinic>, ClinicDeskError> {
        let rows = sqlx::query_as::<_, DbClinic>(
            r#"
        SELECT id, name, identifier, location, status, image_url, username
        FROM clinics
        ORDER BY created_at, id
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn basic_stats(
        &self,
        pool: &SqlitePool,
        today: NaiveDate,
    ) -> Result<BasicStats, ClinicDeskError> {
        let total_hospitals: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clinics")
            .fetch_one(pool)
            .await?;
        let patients_logged_in: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(pool)
            .await?;
        let total_places: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT location) FROM clinics")
            .fetch_one(pool)
            .await?;
        let todays_appointments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE date = ?")
                .bind(today.format("%Y-%m-%d").to_string())
                .fetch_one(pool)
                .await?;

        Ok(BasicStats {
            total_hospitals,
            patients_logged_in,
            total_places,
            todays_appointments,
        })
    }

    async fn patient_analytics(
        &self,
        pool: &SqlitePool,
    ) -> Result<Vec<DailyPatients>, ClinicDeskError> {
        let rows = sqlx::query_as::<_, DailyPatients>(
            r#"
        SELECT strftime('%Y-%m-%d', created_at) AS day, COUNT(*) AS new_patients
        FROM patients
        WHERE strftime('%Y-%m-%d', created_at) IS NOT NULL
        GROUP BY day
        ORDER BY day ASC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn clinic_locations(&self, pool: &SqlitePool) -> Result<Vec<String>, ClinicDeskError> {
        let rows: Vec<String> = sqlx::query_scalar("SELECT location FROM clinics")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, ClinicDeskError> {
    // Unnamed: ractor actor names are process-global.
    let (actor, _jh) = ractor::Actor::spawn(
        None,
        DbActor,
        database_url.to_string(),
    )
    .await
    .map_err(|e| ClinicDeskError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), ClinicDeskError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
