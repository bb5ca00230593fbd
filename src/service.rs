use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row, ToSql};
use serde::Serialize;
use time::OffsetDateTime;

use crate::dimensions::{Dimension, StoredField};
use crate::normalize::normalize;
use crate::validation::validate_and_normalize_post;
use crate::{Database, Post, PostBuilder, PostDraft, PostId, TagDimensions};

const POST_COLUMNS: &str = "id, title, company, content, category, recruit_type, location, \
     experience, salary, technologies, custom_tags, created_at, updated_at";

/// Result of submitting a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Submission {
    /// The post was normalized and stored.
    Accepted { post: Post, warnings: Vec<String> },
    /// The post failed validation and nothing was stored.
    Rejected {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Filters for [`PostService::list_posts`].
///
/// Every filter must match (AND). Values are compared against canonical
/// stored values: exact for scalar fields, membership for `technologies` and
/// `custom`, `YYYY-MM` for `publishMonth`. `company` filters match posts whose
/// stored company normalizes to the given name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub filters: Vec<(Dimension, String)>,
    /// Maximum number of posts to return. None means no limit.
    pub limit: Option<usize>,
}

impl PostQuery {
    pub fn filter(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.filters.push((dimension, value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service layer for storing and querying posts.
///
/// Posts are normalized and validated before they are written, so the store
/// only ever holds canonical tag values.
///
/// # Examples
///
/// ```
/// use mianjing::{Database, PostDraft, PostService, RawTagDimensions};
///
/// # fn main() -> anyhow::Result<()> {
/// let service = PostService::new(Database::in_memory()?);
///
/// let draft = PostDraft {
///     title: "鹅厂后端一面".to_string(),
///     company: "鹅厂".to_string(),
///     tag_dimensions: RawTagDimensions {
///         category: Some("后端".to_string()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
///
/// assert!(service.submit(&draft)?.is_accepted());
/// # Ok(())
/// # }
/// ```
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Creates a service over a database that is also shared elsewhere,
    /// typically with a filter aggregator.
    pub fn from_shared(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns a shared handle to the underlying database.
    pub fn shared_database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Normalizes, validates and stores a post, timestamped now.
    pub fn submit(&self, draft: &PostDraft) -> Result<Submission> {
        self.submit_at(draft, OffsetDateTime::now_utc())
    }

    /// Normalizes, validates and stores a post with the given creation time.
    ///
    /// Invalid posts are not written; the validation errors are returned in
    /// [`Submission::Rejected`].
    pub fn submit_at(&self, draft: &PostDraft, created_at: OffsetDateTime) -> Result<Submission> {
        let validation = validate_and_normalize_post(draft);
        if !validation.valid {
            tracing::debug!(errors = ?validation.errors, "post rejected");
            return Ok(Submission::Rejected {
                errors: validation.errors,
                warnings: validation.warnings,
            });
        }

        let post = validation.post;
        let tags = &post.tag_dimensions;
        let timestamp = created_at.unix_timestamp();

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO posts (title, company, content, category, recruit_type, location,
                                experience, salary, technologies, custom_tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            rusqlite::params![
                post.title,
                post.company,
                post.content,
                tags.category,
                tags.recruit_type,
                tags.location,
                tags.experience,
                tags.salary,
                serde_json::to_string(&tags.technologies)?,
                serde_json::to_string(&tags.custom)?,
                timestamp,
            ],
        )
        .context("Failed to insert post")?;
        let id = PostId::new(conn.last_insert_rowid());
        tracing::info!(%id, company = %post.company, "post stored");

        let created_at = OffsetDateTime::from_unix_timestamp(timestamp)?;
        let stored = PostBuilder::new()
            .id(id)
            .title(post.title)
            .company(post.company)
            .content(post.content)
            .tag_dimensions(post.tag_dimensions)
            .created_at(created_at)
            .updated_at(created_at)
            .build();

        Ok(Submission::Accepted {
            post: stored,
            warnings: validation.warnings,
        })
    }

    /// Retrieves a post by ID.
    ///
    /// Returns `Ok(None)` if no post with the given ID exists.
    pub fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))?;

        let row = stmt
            .query_row([id.get()], read_post_row)
            .optional()
            .with_context(|| format!("Failed to load post {id}"))?;

        row.map(PostRow::into_post).transpose()
    }

    /// Lists posts newest first, keeping those that match every filter.
    pub fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let mut clauses = Vec::new();
        let mut params: Vec<&dyn ToSql> = Vec::new();
        let mut companies = Vec::new();

        for (dimension, value) in &query.filters {
            if *dimension == Dimension::Company {
                companies.push(value.as_str());
                continue;
            }

            params.push(value);
            let index = params.len();
            clauses.push(match dimension.stored_field() {
                Some(StoredField::Scalar(column)) => format!("{column} = ?{index}"),
                Some(StoredField::Array(column)) => format!(
                    "EXISTS (SELECT 1 FROM json_each(posts.{column}) j WHERE j.value = ?{index})"
                ),
                None => format!("strftime('%Y-%m', created_at, 'unixepoch') = ?{index}"),
            });
        }

        let mut sql = format!("SELECT {POST_COLUMNS} FROM posts");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.db.connection();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), read_post_row)?;

        let mut posts = Vec::new();
        for row in rows {
            if query.limit.is_some_and(|limit| posts.len() >= limit) {
                break;
            }
            let post = row?.into_post()?;
            let company = normalize(Dimension::Company, post.company());
            if companies.iter().all(|wanted| company == *wanted) {
                posts.push(post);
            }
        }

        Ok(posts)
    }

    /// Deletes a post by ID. Deleting a missing post is not an error.
    pub fn delete_post(&self, id: PostId) -> Result<()> {
        self.db
            .connection()
            .execute("DELETE FROM posts WHERE id = ?1", [id.get()])
            .with_context(|| format!("Failed to delete post {id}"))?;
        Ok(())
    }
}

/// A `posts` row as read from SQLite, before timestamp and JSON decoding.
struct PostRow {
    id: i64,
    title: String,
    company: String,
    content: String,
    category: String,
    recruit_type: Option<String>,
    location: Option<String>,
    experience: Option<String>,
    salary: Option<String>,
    technologies: String,
    custom_tags: String,
    created_at: i64,
    updated_at: i64,
}

fn read_post_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        content: row.get(3)?,
        category: row.get(4)?,
        recruit_type: row.get(5)?,
        location: row.get(6)?,
        experience: row.get(7)?,
        salary: row.get(8)?,
        technologies: row.get(9)?,
        custom_tags: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl PostRow {
    fn into_post(self) -> Result<Post> {
        let tag_dimensions = TagDimensions {
            category: self.category,
            recruit_type: self.recruit_type,
            location: self.location,
            experience: self.experience,
            salary: self.salary,
            technologies: serde_json::from_str(&self.technologies)
                .with_context(|| format!("Malformed technologies for post {}", self.id))?,
            custom: serde_json::from_str(&self.custom_tags)
                .with_context(|| format!("Malformed custom tags for post {}", self.id))?,
        };

        Ok(PostBuilder::new()
            .id(PostId::new(self.id))
            .title(self.title)
            .company(self.company)
            .content(self.content)
            .tag_dimensions(tag_dimensions)
            .created_at(OffsetDateTime::from_unix_timestamp(self.created_at)?)
            .updated_at(OffsetDateTime::from_unix_timestamp(self.updated_at)?)
            .build())
    }
}
