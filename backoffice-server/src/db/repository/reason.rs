//! Reason Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reason, ReasonCreate, ReasonType, ReasonUpdate};
use shared::util::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "reason";

#[derive(serde::Serialize)]
struct ReasonPatch {
    text: String,
    is_active: bool,
    updated_at: String,
}

#[derive(Clone)]
pub struct ReasonRepository {
    base: BaseRepository,
    restaurant: String,
}

impl ReasonRepository {
    pub fn new(db: Surreal<Db>, restaurant: impl Into<String>) -> Self {
        Self {
            base: BaseRepository::new(db),
            restaurant: restaurant.into(),
        }
    }

    /// All reasons for the restaurant, optionally filtered by type
    pub async fn find_all(&self, reason_type: Option<ReasonType>) -> RepoResult<Vec<Reason>> {
        let filter = match reason_type {
            Some(_) => " AND reason_type = $reason_type",
            None => "",
        };
        let query = format!(
            "SELECT * FROM reason WHERE restaurant = $restaurant{filter} ORDER BY created_at"
        );
        let mut q = self
            .base
            .db()
            .query(query)
            .bind(("restaurant", self.restaurant.clone()));
        if let Some(reason_type) = reason_type {
            q = q.bind(("reason_type", reason_type.as_str()));
        }
        let reasons: Vec<Reason> = q.await?.take(0)?;
        Ok(reasons)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reason>> {
        let thing = self.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM reason WHERE id = $id AND restaurant = $restaurant")
            .bind(("id", thing))
            .bind(("restaurant", self.restaurant.clone()))
            .await?;
        let reasons: Vec<Reason> = result.take(0)?;
        Ok(reasons.into_iter().next())
    }

    /// An active reason usable for the given transition type
    pub async fn find_active(
        &self,
        id: &str,
        reason_type: ReasonType,
    ) -> RepoResult<Option<Reason>> {
        let reason = self.find_by_id(id).await?;
        Ok(reason.filter(|r| r.is_active && r.reason_type == reason_type))
    }

    async fn find_by_text(
        &self,
        reason_type: ReasonType,
        text: &str,
    ) -> RepoResult<Option<Reason>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM reason \
                 WHERE restaurant = $restaurant AND reason_type = $reason_type \
                   AND text = $text LIMIT 1",
            )
            .bind(("restaurant", self.restaurant.clone()))
            .bind(("reason_type", reason_type.as_str()))
            .bind(("text", text.to_string()))
            .await?;
        let reasons: Vec<Reason> = result.take(0)?;
        Ok(reasons.into_iter().next())
    }

    pub async fn create(&self, data: ReasonCreate) -> RepoResult<Reason> {
        let text = data.text.trim().to_string();
        if text.is_empty() {
            return Err(RepoError::Validation("Reason text cannot be empty".to_string()));
        }
        if self.find_by_text(data.reason_type, &text).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Reason '{}' already exists for type {}",
                text,
                data.reason_type.as_str()
            )));
        }

        let now = now_rfc3339();
        let reason = Reason {
            id: None,
            restaurant: self.restaurant.clone(),
            reason_type: data.reason_type,
            text,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        let created: Option<Reason> = self.base.db().create(TABLE).content(reason).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reason".to_string()))
    }

    pub async fn update(&self, id: &str, data: ReasonUpdate) -> RepoResult<Reason> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reason {} not found", id)))?;

        let text = match data.text {
            Some(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(RepoError::Validation(
                        "Reason text cannot be empty".to_string(),
                    ));
                }
                if text != existing.text
                    && self
                        .find_by_text(existing.reason_type, &text)
                        .await?
                        .is_some()
                {
                    return Err(RepoError::Duplicate(format!(
                        "Reason '{}' already exists for type {}",
                        text,
                        existing.reason_type.as_str()
                    )));
                }
                text
            }
            None => existing.text.clone(),
        };

        // Merge only the changed fields; a targeted update rejects content
        // that carries its own `id`
        let patch = ReasonPatch {
            text,
            is_active: data.is_active.unwrap_or(existing.is_active),
            updated_at: now_rfc3339(),
        };
        let thing = self.parse_id(id)?;
        let saved: Option<Reason> = self.base.db().update(thing).merge(patch).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to update reason".to_string()))
    }

    /// Soft-deactivate; historical references keep resolving
    pub async fn deactivate(&self, id: &str) -> RepoResult<Reason> {
        self.update(
            id,
            ReasonUpdate {
                text: None,
                is_active: Some(false),
            },
        )
        .await
    }

    fn parse_id(&self, id: &str) -> RepoResult<RecordId> {
        if let Ok(thing) = id.parse::<RecordId>() {
            return Ok(thing);
        }
        Ok(RecordId::from_table_key(TABLE, id))
    }
}
