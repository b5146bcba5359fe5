//! PostgreSQL implementation of TouchpointRepository.
//!
//! The kind is stored as `message`/`event` with the content or event name in
//! `detail`; the stage assigned at record time is stored, not recomputed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::foundation::{BusinessId, DomainError, GuestId, Timestamp, TouchpointId};
use crate::domain::journey::{FunnelStage, Touchpoint, TouchpointKind};
use crate::ports::TouchpointRepository;

#[derive(Clone)]
pub struct PostgresTouchpointRepository {
    pool: PgPool,
}

impl PostgresTouchpointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TouchpointRow {
    id: Uuid,
    business_id: Uuid,
    guest_id: String,
    occurred_at: DateTime<Utc>,
    kind: String,
    detail: String,
    stage: String,
}

impl TryFrom<TouchpointRow> for Touchpoint {
    type Error = DomainError;

    fn try_from(row: TouchpointRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "message" => TouchpointKind::Message { content: row.detail },
            "event" => TouchpointKind::Event { name: row.detail },
            other => return Err(corrupt("kind", other)),
        };
        Ok(Touchpoint {
            id: TouchpointId::from_uuid(row.id),
            business_id: BusinessId::from_uuid(row.business_id),
            guest_id: GuestId::new(row.guest_id).map_err(|_| corrupt("guest_id", "<blank>"))?,
            occurred_at: Timestamp::from_datetime(row.occurred_at),
            kind,
            stage: FunnelStage::parse(&row.stage).ok_or_else(|| corrupt("stage", &row.stage))?,
        })
    }
}

fn kind_columns(kind: &TouchpointKind) -> (&'static str, &str) {
    match kind {
        TouchpointKind::Message { content } => ("message", content),
        TouchpointKind::Event { name } => ("event", name),
    }
}

#[async_trait]
impl TouchpointRepository for PostgresTouchpointRepository {
    async fn record(&self, touchpoint: &Touchpoint) -> Result<(), DomainError> {
        let (kind, detail) = kind_columns(&touchpoint.kind);

        sqlx::query(
            r#"
            INSERT INTO touchpoints (id, business_id, guest_id, occurred_at, kind, detail, stage)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(touchpoint.id.as_uuid())
        .bind(touchpoint.business_id.as_uuid())
        .bind(touchpoint.guest_id.as_str())
        .bind(touchpoint.occurred_at.as_datetime())
        .bind(kind)
        .bind(detail)
        .bind(touchpoint.stage.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record touchpoint"))?;

        Ok(())
    }

    async fn list_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<Touchpoint>, DomainError> {
        let rows = sqlx::query_as::<_, TouchpointRow>(
            r#"
            SELECT id, business_id, guest_id, occurred_at, kind, detail, stage
            FROM touchpoints
            WHERE business_id = $1 AND occurred_at >= $2
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(since.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list touchpoints"))?;

        rows.into_iter().map(Touchpoint::try_from).collect()
    }

    async fn list_for_guest(
        &self,
        business_id: BusinessId,
        guest_id: &GuestId,
    ) -> Result<Vec<Touchpoint>, DomainError> {
        let rows = sqlx::query_as::<_, TouchpointRow>(
            r#"
            SELECT id, business_id, guest_id, occurred_at, kind, detail, stage
            FROM touchpoints
            WHERE business_id = $1 AND guest_id = $2
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(guest_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list guest touchpoints"))?;

        rows.into_iter().map(Touchpoint::try_from).collect()
    }
}
