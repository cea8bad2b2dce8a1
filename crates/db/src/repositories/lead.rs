//! Lead repository: capture, staff workflow, export, and analytics queries.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use larder_core::leads::{
    DayCount, LeadError, LeadFilter, LeadStatus, LeadUpdate, NewLead, SourceCount, StatusCount,
    SummaryWindow, count_by_day, count_by_source,
};

use crate::entities::{lead_notes, leads, sea_orm_active_enums, users};

/// Rows fetched per round trip by the CSV export.
pub const EXPORT_BATCH_SIZE: u64 = 500;

/// Lead as returned by the API, JSON columns decoded.
#[derive(Debug, Clone, Serialize)]
pub struct LeadRecord {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub utm: Value,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub tags: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<leads::Model> for LeadRecord {
    fn from(lead: leads::Model) -> Self {
        Self {
            id: lead.id,
            full_name: lead.full_name,
            email: lead.email,
            phone: lead.phone,
            source: lead.source,
            utm: serde_json::from_str(&lead.utm).unwrap_or_else(|_| Value::Object(Map::new())),
            message: lead.message,
            status: lead.status.into(),
            tags: lead.tags.and_then(|t| serde_json::from_str(&t).ok()),
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

/// Note with its author's email.
#[derive(Debug, Clone, Serialize)]
pub struct NoteRecord {
    pub id: i64,
    pub lead_id: i64,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Lead with its notes, newest note first.
#[derive(Debug, Clone, Serialize)]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub notes: Vec<NoteRecord>,
}

/// Lead analytics over a look-back window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub by_day: Vec<DayCount>,
    pub by_source: Vec<SourceCount>,
    pub by_status: Vec<StatusCount>,
}

/// Lead repository.
#[derive(Debug, Clone)]
pub struct LeadRepository {
    db: DatabaseConnection,
}

impl LeadRepository {
    /// Creates a new lead repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a contact form submission with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the insert fails.
    pub async fn create(&self, input: &NewLead) -> Result<leads::Model, LeadError> {
        let now = Utc::now();
        let lead = leads::ActiveModel {
            full_name: Set(input.full_name.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone.clone()),
            source: Set(input.source_or_default()),
            utm: Set(input.utm_or_default().to_string()),
            message: Set(input.message.clone()),
            status: Set(sea_orm_active_enums::LeadStatus::New),
            tags: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        info!(lead_id = %lead.id, source = %lead.source, "Lead captured");
        Ok(lead)
    }

    /// Lists leads matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list(&self, filter: &LeadFilter) -> Result<Vec<LeadRecord>, LeadError> {
        let mut query = leads::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(leads::Column::Status.eq(sea_orm_active_enums::LeadStatus::from(status)));
        }
        if let Some(q) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(leads::Column::FullName.contains(q))
                    .add(leads::Column::Email.contains(q))
                    .add(leads::Column::Phone.contains(q)),
            );
        }
        if let Some(from) = filter.created_from {
            query = query.filter(leads::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_to {
            query = query.filter(leads::Column::CreatedAt.lte(to));
        }

        let rows = query
            .order_by_desc(leads::Column::CreatedAt)
            .order_by_desc(leads::Column::Id)
            .offset(filter.page.offset())
            .limit(filter.page.limit())
            .all(&self.db)
            .await
            .map_err(db_error)?;

        debug!(count = rows.len(), page = filter.page.page, "Listed leads");
        Ok(rows.into_iter().map(LeadRecord::from).collect())
    }

    /// Finds a lead by id.
    ///
    /// # Errors
    ///
    /// * `NotFound` if no such lead exists
    /// * `Database` if the query fails
    pub async fn find(&self, id: i64) -> Result<leads::Model, LeadError> {
        leads::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LeadError::NotFound(id))
    }

    /// Finds a lead together with its notes.
    ///
    /// # Errors
    ///
    /// * `NotFound` if no such lead exists
    /// * `Database` if the query fails
    pub async fn find_with_notes(&self, id: i64) -> Result<LeadDetail, LeadError> {
        let lead = self.find(id).await?;

        let notes = lead_notes::Entity::find()
            .filter(lead_notes::Column::LeadId.eq(id))
            .find_also_related(users::Entity)
            .order_by_desc(lead_notes::Column::CreatedAt)
            .order_by_desc(lead_notes::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|(note, user)| NoteRecord {
                id: note.id,
                lead_id: note.lead_id,
                user_id: note.user_id,
                user_email: user.map(|u| u.email),
                note: note.note,
                created_at: note.created_at,
            })
            .collect();

        Ok(LeadDetail {
            lead: lead.into(),
            notes,
        })
    }

    /// Applies a staff update and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if no such lead exists
    /// * `Database` if the update fails
    pub async fn update(&self, id: i64, update: &LeadUpdate) -> Result<leads::Model, LeadError> {
        let lead = self.find(id).await?;

        let mut active: leads::ActiveModel = lead.into();
        if let Some(status) = update.status {
            active.status = Set(status.into());
        }
        if let Some(tags) = &update.tags {
            let encoded = serde_json::to_string(tags).map_err(|e| LeadError::Database(e.to_string()))?;
            active.tags = Set(Some(encoded));
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(db_error)
    }

    /// Appends a note to a lead.
    ///
    /// # Errors
    ///
    /// * `EmptyNote` if the note is blank
    /// * `NotFound` if no such lead exists
    /// * `Database` if the insert fails
    pub async fn add_note(
        &self,
        lead_id: i64,
        user_id: i64,
        note: &str,
    ) -> Result<lead_notes::Model, LeadError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(LeadError::EmptyNote);
        }
        self.find(lead_id).await?;

        lead_notes::ActiveModel {
            lead_id: Set(lead_id),
            user_id: Set(Some(user_id)),
            note: Set(note.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)
    }

    /// Fetches one export batch: up to `size` leads with an id below `before_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn export_batch(
        &self,
        before_id: Option<i64>,
        size: u64,
    ) -> Result<Vec<leads::Model>, DbErr> {
        let mut query = leads::Entity::find();
        if let Some(id) = before_id {
            query = query.filter(leads::Column::Id.lt(id));
        }
        query
            .order_by_desc(leads::Column::Id)
            .limit(size)
            .all(&self.db)
            .await
    }

    /// Builds the analytics summary.
    ///
    /// Day and source counts cover leads created inside the window; status
    /// counts cover every lead.
    ///
    /// # Errors
    ///
    /// Returns `Database` if a query fails.
    pub async fn summary(
        &self,
        window: SummaryWindow,
        now: DateTime<Utc>,
    ) -> Result<LeadSummary, LeadError> {
        let recent: Vec<(DateTime<Utc>, String)> = leads::Entity::find()
            .select_only()
            .column(leads::Column::CreatedAt)
            .column(leads::Column::Source)
            .filter(leads::Column::CreatedAt.gte(window.since(now)))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let by_status: Vec<(String, i64)> = leads::Entity::find()
            .select_only()
            .column(leads::Column::Status)
            .column_as(Expr::col(leads::Column::Id).count(), "count")
            .group_by(leads::Column::Status)
            .order_by_asc(leads::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let (created, sources): (Vec<_>, Vec<_>) = recent.into_iter().unzip();

        Ok(LeadSummary {
            by_day: count_by_day(created),
            by_source: count_by_source(sources),
            by_status: by_status
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status,
                    count: u64::try_from(count).unwrap_or_default(),
                })
                .collect(),
        })
    }
}

fn db_error(e: DbErr) -> LeadError {
    LeadError::Database(e.to_string())
}
