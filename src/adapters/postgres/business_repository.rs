//! PostgreSQL implementation of BusinessRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::business::{BusinessProfile, BusinessType};
use crate::domain::foundation::{BusinessId, DomainError, ErrorCode, Timestamp};
use crate::domain::tier::Tier;
use crate::domain::widget::{WidgetConfig, WidgetPosition};
use crate::ports::BusinessRepository;

#[derive(Clone)]
pub struct PostgresBusinessRepository {
    pool: PgPool,
}

impl PostgresBusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: Uuid,
    name: String,
    business_type: String,
    tier: String,
    description: Option<String>,
    location: Option<String>,
    check_in_time: Option<String>,
    check_out_time: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    booking_url: Option<String>,
    amenities: Vec<String>,
    policies: Vec<String>,
    default_language: String,
    custom_instructions: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<BusinessRow> for BusinessProfile {
    type Error = DomainError;

    fn try_from(row: BusinessRow) -> Result<Self, Self::Error> {
        let tier: Tier = row.tier.parse().map_err(|_| corrupt("tier", &row.tier))?;
        Ok(BusinessProfile {
            id: BusinessId::from_uuid(row.id),
            name: row.name,
            business_type: BusinessType::parse(&row.business_type),
            tier,
            description: row.description,
            location: row.location,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            contact_phone: row.contact_phone,
            contact_email: row.contact_email,
            booking_url: row.booking_url,
            amenities: row.amenities,
            policies: row.policies,
            default_language: row.default_language,
            custom_instructions: row.custom_instructions,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WidgetRow {
    business_id: Uuid,
    primary_color: String,
    position: String,
    greeting: String,
    placeholder: String,
    launcher_label: String,
    show_branding: bool,
}

impl TryFrom<WidgetRow> for WidgetConfig {
    type Error = DomainError;

    fn try_from(row: WidgetRow) -> Result<Self, Self::Error> {
        let position =
            WidgetPosition::parse(&row.position).ok_or_else(|| corrupt("position", &row.position))?;
        Ok(WidgetConfig {
            business_id: BusinessId::from_uuid(row.business_id),
            primary_color: row.primary_color,
            position,
            greeting: row.greeting,
            placeholder: row.placeholder,
            launcher_label: row.launcher_label,
            show_branding: row.show_branding,
        })
    }
}

const BUSINESS_COLUMNS: &str = "id, name, business_type, tier, description, location, \
     check_in_time, check_out_time, contact_phone, contact_email, booking_url, amenities, \
     policies, default_language, custom_instructions, active, created_at";

#[async_trait]
impl BusinessRepository for PostgresBusinessRepository {
    async fn save(&self, business: &BusinessProfile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO businesses (
                id, name, business_type, tier, description, location,
                check_in_time, check_out_time, contact_phone, contact_email, booking_url,
                amenities, policies, default_language, custom_instructions, active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(business.id.as_uuid())
        .bind(&business.name)
        .bind(business.business_type.as_str())
        .bind(business.tier.as_str())
        .bind(&business.description)
        .bind(&business.location)
        .bind(&business.check_in_time)
        .bind(&business.check_out_time)
        .bind(&business.contact_phone)
        .bind(&business.contact_email)
        .bind(&business.booking_url)
        .bind(&business.amenities)
        .bind(&business.policies)
        .bind(&business.default_language)
        .bind(&business.custom_instructions)
        .bind(business.active)
        .bind(business.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert business"))?;

        Ok(())
    }

    async fn update(&self, business: &BusinessProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE businesses SET
                name = $2, business_type = $3, tier = $4, description = $5, location = $6,
                check_in_time = $7, check_out_time = $8, contact_phone = $9,
                contact_email = $10, booking_url = $11, amenities = $12, policies = $13,
                default_language = $14, custom_instructions = $15, active = $16
            WHERE id = $1
            "#,
        )
        .bind(business.id.as_uuid())
        .bind(&business.name)
        .bind(business.business_type.as_str())
        .bind(business.tier.as_str())
        .bind(&business.description)
        .bind(&business.location)
        .bind(&business.check_in_time)
        .bind(&business.check_out_time)
        .bind(&business.contact_phone)
        .bind(&business.contact_email)
        .bind(&business.booking_url)
        .bind(&business.amenities)
        .bind(&business.policies)
        .bind(&business.default_language)
        .bind(&business.custom_instructions)
        .bind(business.active)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update business"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::BusinessNotFound,
                format!("Business not found: {}", business.id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: BusinessId) -> Result<Option<BusinessProfile>, DomainError> {
        let query = format!("SELECT {} FROM businesses WHERE id = $1", BUSINESS_COLUMNS);
        sqlx::query_as::<_, BusinessRow>(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch business"))?
            .map(BusinessProfile::try_from)
            .transpose()
    }

    async fn find_widget_config(&self, id: BusinessId) -> Result<Option<WidgetConfig>, DomainError> {
        sqlx::query_as::<_, WidgetRow>(
            r#"
            SELECT business_id, primary_color, position, greeting, placeholder,
                   launcher_label, show_branding
            FROM widget_configs WHERE business_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch widget config"))?
        .map(WidgetConfig::try_from)
        .transpose()
    }

    async fn save_widget_config(&self, config: &WidgetConfig) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO widget_configs (
                business_id, primary_color, position, greeting, placeholder,
                launcher_label, show_branding
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (business_id) DO UPDATE SET
                primary_color = EXCLUDED.primary_color,
                position = EXCLUDED.position,
                greeting = EXCLUDED.greeting,
                placeholder = EXCLUDED.placeholder,
                launcher_label = EXCLUDED.launcher_label,
                show_branding = EXCLUDED.show_branding
            "#,
        )
        .bind(config.business_id.as_uuid())
        .bind(&config.primary_color)
        .bind(config.position.as_str())
        .bind(&config.greeting)
        .bind(&config.placeholder)
        .bind(&config.launcher_label)
        .bind(config.show_branding)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save widget config"))?;

        Ok(())
    }
}
