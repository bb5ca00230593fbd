use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{PostId, RawTagDimensions, TagDimensions};

/// A stored interview experience or job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    title: String,
    company: String,
    content: String,
    tag_dimensions: TagDimensions,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Post {
    /// Returns the post's unique identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the company exactly as submitted (trimmed).
    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the normalized classification tags.
    pub fn tag_dimensions(&self) -> &TagDimensions {
        &self.tag_dimensions
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}

/// Builder for constructing `Post` instances.
///
/// # Examples
///
/// ```
/// use mianjing::{PostBuilder, PostId, TagDimensions};
///
/// let post = PostBuilder::new()
///     .id(PostId::new(1))
///     .title("字节后端一面")
///     .company("字节")
///     .tag_dimensions(TagDimensions {
///         category: "SWE".to_string(),
///         ..Default::default()
///     })
///     .build();
///
/// assert_eq!(post.id(), PostId::new(1));
/// assert_eq!(post.tag_dimensions().category, "SWE");
/// assert_eq!(post.content(), "");
/// ```
#[derive(Debug, Default)]
pub struct PostBuilder {
    id: Option<PostId>,
    title: Option<String>,
    company: Option<String>,
    content: Option<String>,
    tag_dimensions: Option<TagDimensions>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl PostBuilder {
    /// Creates a new `PostBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: PostId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tag_dimensions(mut self, tag_dimensions: TagDimensions) -> Self {
        self.tag_dimensions = Some(tag_dimensions);
        self
    }

    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: OffsetDateTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the `Post`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id` has not been set.
    pub fn build(self) -> Post {
        let now = OffsetDateTime::now_utc();
        let created_at = self.created_at.unwrap_or(now);
        Post {
            id: self.id.expect("id is required"),
            title: self.title.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            tag_dimensions: self.tag_dimensions.unwrap_or_default(),
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// A candidate post as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag_dimensions: RawTagDimensions,
}

/// A candidate post after normalization; ready to persist when valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPost {
    pub title: String,
    pub company: String,
    pub content: String,
    pub tag_dimensions: TagDimensions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn builder_defaults_updated_at_to_created_at() {
        let created = datetime!(2024-01-15 08:30 UTC);
        let post = PostBuilder::new()
            .id(PostId::new(3))
            .title("t")
            .company("c")
            .created_at(created)
            .build();

        assert_eq!(post.created_at(), created);
        assert_eq!(post.updated_at(), created);
        assert!(post.tag_dimensions().technologies.is_empty());
    }

    #[test]
    fn post_serializes_with_camel_case_and_rfc3339() {
        let post = PostBuilder::new()
            .id(PostId::new(1))
            .title("Meta E5 面经")
            .company("买它")
            .created_at(datetime!(2024-02-01 00:00 UTC))
            .build();

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["tagDimensions"]["category"], "");
        assert_eq!(json["createdAt"], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn draft_deserializes_with_missing_fields() {
        let draft: PostDraft =
            serde_json::from_str(r#"{"title": "t", "tagDimensions": {"category": "算法"}}"#)
                .unwrap();

        assert_eq!(draft.title, "t");
        assert_eq!(draft.company, "");
        assert_eq!(draft.tag_dimensions.category.as_deref(), Some("算法"));
    }
}
