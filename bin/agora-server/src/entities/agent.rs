use crate::entities::{
    dao::{Agent, AgentPatch, NewAgent},
    SqliteStore,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::future::Future;
use uuid::Uuid;

pub trait AgentStore: Send + Sync + 'static {
    /// Insert a new agent and return the stored record.
    fn create_agent(&self, agent: NewAgent) -> impl Future<Output = Result<Agent, sqlx::Error>> + Send;
    /// Agents owned by `owner_id`, newest first.
    fn list_agents(&self, owner_id: &str) -> impl Future<Output = Result<Vec<Agent>, sqlx::Error>> + Send;
    fn get_agent(&self, id: &str) -> impl Future<Output = Result<Option<Agent>, sqlx::Error>> + Send;
    /// Shallow-merge `patch` into the stored row. `None` when no row matches.
    fn update_agent(
        &self,
        id: &str,
        patch: AgentPatch,
    ) -> impl Future<Output = Result<Option<Agent>, sqlx::Error>> + Send;
    /// Returns `true` when a row was deleted.
    fn delete_agent(&self, id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

type AgentRow = (
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    f64,
    i64,
    bool,
    String,
    String,
);

const AGENT_COLUMNS: &str = "id, owner_id, name, description, system_prompt, model, \
     temperature, max_tokens, is_active, created_at, updated_at";

fn timestamp(at: DateTime<Utc>) -> String {
    // Fixed precision keeps lexical order equal to chronological order.
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A stored value that cannot be read back is a decode error, not a default.
fn decode_error(column: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode { index: column.to_owned(), source: Box::new(source) }
}

fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    raw.parse().map_err(|e: chrono::ParseError| decode_error(column, e))
}

fn from_row(row: AgentRow) -> Result<Agent, sqlx::Error> {
    let (
        id,
        owner_id,
        name,
        description,
        system_prompt,
        model,
        temperature,
        max_tokens,
        is_active,
        created_at,
        updated_at,
    ) = row;
    Ok(Agent {
        id,
        owner_id,
        name,
        description,
        system_prompt,
        model,
        temperature: temperature as f32,
        max_tokens: u32::try_from(max_tokens).map_err(|e| decode_error("max_tokens", e))?,
        is_active,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

impl AgentStore for SqliteStore {
    async fn create_agent(&self, agent: NewAgent) -> Result<Agent, sqlx::Error> {
        let now = Utc::now();
        let record = Agent {
            id: Uuid::new_v4().to_string(),
            owner_id: agent.owner_id,
            name: agent.name,
            description: agent.description,
            system_prompt: agent.system_prompt,
            model: agent.model,
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO agents \
             (id, owner_id, name, description, system_prompt, model, temperature, max_tokens, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&record.id)
        .bind(&record.owner_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.system_prompt)
        .bind(&record.model)
        .bind(f64::from(record.temperature))
        .bind(i64::from(record.max_tokens))
        .bind(record.is_active)
        .bind(timestamp(record.created_at))
        .bind(timestamp(record.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_agents(&self, owner_id: &str) -> Result<Vec<Agent>, sqlx::Error> {
        let rows: Vec<AgentRow> = sqlx::query_as(&format!(
            "SELECT {AGENT_COLUMNS} FROM agents WHERE owner_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    async fn get_agent(&self, id: &str) -> Result<Option<Agent>, sqlx::Error> {
        let row: Option<AgentRow> =
            sqlx::query_as(&format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(from_row).transpose()
    }

    async fn update_agent(&self, id: &str, patch: AgentPatch) -> Result<Option<Agent>, sqlx::Error> {
        let row: Option<AgentRow> = sqlx::query_as(&format!(
            "UPDATE agents SET \
             name = COALESCE(?1, name), \
             description = COALESCE(?2, description), \
             system_prompt = COALESCE(?3, system_prompt), \
             model = COALESCE(?4, model), \
             temperature = COALESCE(?5, temperature), \
             max_tokens = COALESCE(?6, max_tokens), \
             is_active = COALESCE(?7, is_active), \
             updated_at = ?8 \
             WHERE id = ?9 \
             RETURNING {AGENT_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.system_prompt)
        .bind(patch.model)
        .bind(patch.temperature.map(f64::from))
        .bind(patch.max_tokens.map(i64::from))
        .bind(patch.is_active)
        .bind(timestamp(Utc::now()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(from_row).transpose()
    }

    async fn delete_agent(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
