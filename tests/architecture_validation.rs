//! Architecture Validation Integration Tests
//!
//! Confirms that the service, validation and filter layers can be used without
//! any CLI dependencies (clap, dirs, dotenvy), proving they are reusable behind
//! other front ends such as an HTTP server.
//!
//! **Critical Architecture Invariant:**
//! This file must NOT import anything from main.rs. It must only use types
//! exported from the `mianjing::` crate.
//!
//! **CLI types that should NOT be exported from crate root:**
//! - Cli (clap command parser)
//! - Commands (clap subcommands enum)
//! - AddCommand, ListCommand, ValidateCommand
//! - UserError (exit code classification)

use std::sync::Arc;

use anyhow::Result;
use mianjing::store::PostStore;
use mianjing::{
    Database, Dimension, DimensionCatalog, FilterAggregator, FilterOptionsCache, Post, PostBuilder,
    PostDraft, PostId, PostQuery, PostService, RawTagDimensions, Submission, TagDimensions,
};

/// Helper function for PostService instantiation.
///
/// Uses `Database::in_memory()` for test isolation.
fn create_test_service() -> PostService {
    let db = Database::in_memory().expect("failed to create in-memory database");
    PostService::new(db)
}

fn swe_draft(title: &str, company: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        company: company.to_string(),
        content: String::new(),
        tag_dimensions: RawTagDimensions {
            category: Some("SWE".to_string()),
            ..Default::default()
        },
    }
}

#[test]
fn test_postservice_instantiates_without_cli_context() {
    let service = create_test_service();

    let count: i64 = service
        .database()
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'",
            [],
            |row| row.get(0),
        )
        .expect("failed to query schema");

    assert!(
        count >= 2,
        "expected at least 2 tables (posts, schema_migrations), found {}",
        count
    );
}

#[test]
fn test_full_workflow_without_cli() -> Result<()> {
    let service = create_test_service();

    let Submission::Accepted { post, .. } = service.submit(&swe_draft("一面", "Google"))? else {
        panic!("expected the post to be accepted");
    };

    let fetched = service.get_post(post.id())?;
    assert_eq!(fetched.as_ref(), Some(&post));

    let listed = service.list_posts(&PostQuery::default().filter(Dimension::Company, "Google"))?;
    assert_eq!(listed.len(), 1);

    service.delete_post(post.id())?;
    assert!(service.get_post(post.id())?.is_none());

    Ok(())
}

#[test]
fn test_database_is_usable_as_post_store() -> Result<()> {
    let service = create_test_service();
    service.submit(&swe_draft("一面", "Meta"))?;

    let store: Arc<dyn PostStore> = service.shared_database();
    assert_eq!(store.count_posts()?, 1);
    assert_eq!(store.distinct_values(Dimension::Company)?, vec!["Meta"]);

    Ok(())
}

#[tokio::test]
async fn test_filter_layer_runs_without_cli() -> Result<()> {
    let service = create_test_service();
    service.submit(&swe_draft("一面", "Meta"))?;

    let aggregator = FilterAggregator::new(
        service.shared_database(),
        Arc::new(DimensionCatalog::builtin()),
    );
    let cache = FilterOptionsCache::new(aggregator);

    let response = cache.get(false).await;
    assert!(response.success);
    assert!(response.data.get("company").is_some());

    Ok(())
}

#[test]
fn test_domain_types_construct_directly() {
    let post: Post = PostBuilder::new()
        .id(PostId::new(9))
        .title("t")
        .company("Apple")
        .tag_dimensions(TagDimensions {
            category: "Design".to_string(),
            ..Default::default()
        })
        .build();

    assert_eq!(post.id().get(), 9);
    assert_eq!(post.tag_dimensions().category, "Design");
    assert_eq!(post.updated_at(), post.created_at());
}
