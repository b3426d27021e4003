use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::connection::{connect_pool, init_contacts_db};
use crate::domain::contact::{
    CampaignContact, GlobalContact, LinkStatus, NewCampaignLink, NewContact,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::store::RecordStore;

/// Keys per `IN (...)` list, well under SQLite's bind limit
const LOOKUP_CHUNK: usize = 500;
/// Rows per multi-row INSERT
const INSERT_CHUNK: usize = 100;

const CONTACT_COLUMNS: &str = "id, first_name, last_name, phone_number, created_at";

const LINK_SELECT: &str = "SELECT cc.id, cc.campaign_id, cc.contact_id, c.first_name, c.last_name, \
     c.phone_number, cc.status, cc.personalization_fields, cc.created_at \
     FROM campaign_contacts cc JOIN contacts c ON c.id = cc.contact_id \
     WHERE cc.campaign_id = ";

#[derive(sqlx::FromRow)]
struct ContactEntity {
    id: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    created_at: String,
}

impl TryFrom<ContactEntity> for GlobalContact {
    type Error = AppError;

    fn try_from(entity: ContactEntity) -> Result<Self> {
        Ok(Self {
            id: parse_id(&entity.id)?,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone_number: entity.phone_number,
            created_at: parse_timestamp(&entity.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CampaignContactEntity {
    id: String,
    campaign_id: String,
    contact_id: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    status: String,
    personalization_fields: String,
    created_at: String,
}

impl TryFrom<CampaignContactEntity> for CampaignContact {
    type Error = AppError;

    fn try_from(entity: CampaignContactEntity) -> Result<Self> {
        Ok(Self {
            id: parse_id(&entity.id)?,
            campaign_id: entity.campaign_id,
            contact_id: parse_id(&entity.contact_id)?,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone_number: entity.phone_number,
            status: LinkStatus::parse(&entity.status).ok_or_else(|| {
                AppError::DatabaseError(format!("Invalid link status \"{}\"", entity.status))
            })?,
            personalization_fields: serde_json::from_str(&entity.personalization_fields)
                .map_err(|e| {
                    AppError::DatabaseError(format!("Invalid personalization fields: {}", e))
                })?,
            created_at: parse_timestamp(&entity.created_at)?,
        })
    }
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::DatabaseError(format!("Invalid id \"{}\": {}", value, e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::DatabaseError(format!("Invalid timestamp \"{}\": {}", value, e)))
}

fn convert_all<E, T>(entities: Vec<E>) -> Result<Vec<T>>
where
    T: TryFrom<E, Error = AppError>,
{
    entities.into_iter().map(T::try_from).collect()
}

/// SQLite-backed record store
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema is in place
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = connect_pool(database_url).await?;
        init_contacts_db(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn links_where_in(
        &self,
        campaign_id: &str,
        column: &str,
        keys: &[String],
    ) -> Result<Vec<CampaignContact>> {
        let mut links = Vec::new();
        for chunk in keys.chunks(LOOKUP_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(LINK_SELECT);
            qb.push_bind(campaign_id);
            qb.push(format!(" AND {} IN (", column));
            let mut separated = qb.separated(", ");
            for key in chunk {
                separated.push_bind(key.as_str());
            }
            separated.push_unseparated(")");

            let rows = qb
                .build_query_as::<CampaignContactEntity>()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to fetch campaign links: {}", e))
                })?;
            links.extend(convert_all::<_, CampaignContact>(rows)?);
        }
        Ok(links)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn find_contact_by_phone(&self, phone_number: &str) -> Result<Option<GlobalContact>> {
        let sql = format!("SELECT {} FROM contacts WHERE phone_number = ?", CONTACT_COLUMNS);
        let entity = sqlx::query_as::<_, ContactEntity>(&sql)
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch contact: {}", e)))?;

        entity.map(GlobalContact::try_from).transpose()
    }

    async fn find_contacts_by_phones(&self, phone_numbers: &[String]) -> Result<Vec<GlobalContact>> {
        let mut contacts = Vec::new();
        for chunk in phone_numbers.chunks(LOOKUP_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "SELECT {} FROM contacts WHERE phone_number IN (",
                CONTACT_COLUMNS
            ));
            let mut separated = qb.separated(", ");
            for phone in chunk {
                separated.push_bind(phone.as_str());
            }
            separated.push_unseparated(")");

            let rows = qb
                .build_query_as::<ContactEntity>()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to fetch contacts: {}", e)))?;
            contacts.extend(convert_all::<_, GlobalContact>(rows)?);
        }
        Ok(contacts)
    }

    async fn find_campaign_links(
        &self,
        campaign_id: &str,
        contact_ids: &[Uuid],
    ) -> Result<Vec<CampaignContact>> {
        let ids: Vec<String> = contact_ids.iter().map(Uuid::to_string).collect();
        self.links_where_in(campaign_id, "cc.contact_id", &ids).await
    }

    async fn find_campaign_links_by_phones(
        &self,
        campaign_id: &str,
        phone_numbers: &[String],
    ) -> Result<Vec<CampaignContact>> {
        self.links_where_in(campaign_id, "c.phone_number", phone_numbers)
            .await
    }

    async fn list_campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>> {
        let sql = format!("{}? ORDER BY cc.created_at, c.phone_number", LINK_SELECT);
        let rows = sqlx::query_as::<_, CampaignContactEntity>(&sql)
            .bind(campaign_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to list campaign contacts: {}", e))
            })?;
        convert_all(rows)
    }

    async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<GlobalContact>> {
        let mut created = Vec::new();
        for chunk in contacts.chunks(INSERT_CHUNK) {
            let now = Utc::now().to_rfc3339();
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO contacts (id, first_name, last_name, phone_number, created_at) ",
            );
            qb.push_values(chunk, |mut row, contact| {
                row.push_bind(Uuid::new_v4().to_string())
                    .push_bind(contact.first_name.as_str())
                    .push_bind(contact.last_name.as_str())
                    .push_bind(contact.phone_number.as_str())
                    .push_bind(now.clone());
            });
            qb.push(" ON CONFLICT(phone_number) DO NOTHING RETURNING ");
            qb.push(CONTACT_COLUMNS);

            let rows = qb
                .build_query_as::<ContactEntity>()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to insert contacts: {}", e)))?;
            created.extend(convert_all::<_, GlobalContact>(rows)?);
        }
        Ok(created)
    }

    async fn insert_campaign_links(&self, links: &[NewCampaignLink]) -> Result<u64> {
        let mut inserted = 0;
        for chunk in links.chunks(INSERT_CHUNK) {
            let now = Utc::now().to_rfc3339();
            let mut rows = Vec::with_capacity(chunk.len());
            for link in chunk {
                let fields = serde_json::to_string(&link.personalization_fields)?;
                rows.push((link, fields));
            }

            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT OR IGNORE INTO campaign_contacts \
                 (id, campaign_id, contact_id, status, personalization_fields, created_at) ",
            );
            qb.push_values(rows, |mut row, (link, fields)| {
                row.push_bind(Uuid::new_v4().to_string())
                    .push_bind(link.campaign_id.as_str())
                    .push_bind(link.contact_id.to_string())
                    .push_bind(link.status.as_str())
                    .push_bind(fields)
                    .push_bind(now.clone());
            });

            let result = qb.build().execute(&self.pool).await.map_err(|e| {
                AppError::DatabaseError(format!("Failed to insert campaign links: {}", e))
            })?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    async fn delete_campaign_links(&self, campaign_id: &str, contact_ids: &[Uuid]) -> Result<u64> {
        let mut deleted = 0;
        for chunk in contact_ids.chunks(LOOKUP_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> =
                QueryBuilder::new("DELETE FROM campaign_contacts WHERE campaign_id = ");
            qb.push_bind(campaign_id);
            qb.push(" AND contact_id IN (");
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(id.to_string());
            }
            separated.push_unseparated(")");

            let result = qb.build().execute(&self.pool).await.map_err(|e| {
                AppError::DatabaseError(format!("Failed to delete campaign links: {}", e))
            })?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }

    async fn count_contact_links(&self, contact_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaign_contacts WHERE contact_id = ?")
            .bind(contact_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count contact links: {}", e)))
    }

    async fn delete_orphaned_contact(&self, contact_id: Uuid) -> Result<u64> {
        let id = contact_id.to_string();
        let result = sqlx::query(
            "DELETE FROM contacts WHERE id = ?
             AND NOT EXISTS (SELECT 1 FROM campaign_contacts WHERE contact_id = ?)",
        )
        .bind(&id)
        .bind(&id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete contact: {}", e)))?;

        Ok(result.rows_affected())
    }
}
