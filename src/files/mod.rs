//! File listing by type, search text and sort order.
//!
//! The route segment (`documents`, `images`, `media`, `others`) selects one or
//! more stored file types. Filtering, searching and ordering are all pushed
//! to the provider's query language; this module only builds the queries and
//! shapes the result.

mod models;

pub use models::{FileRecord, FileType, FilesPage};

use crate::{
    appwrite::{Backend, ProviderResult, Query, Scope},
    auth::UserRecord,
};
use tracing::{debug, instrument};

pub const DEFAULT_FILES_COLLECTION_ID: &str = "files";
pub const DEFAULT_SORT: &str = "$createdAt-desc";

/// Stored file types behind a route segment; unknown segments list documents.
#[must_use]
pub fn file_types_for(segment: &str) -> Vec<FileType> {
    match segment {
        "images" => vec![FileType::Image],
        "media" => vec![FileType::Video, FileType::Audio],
        "others" => vec![FileType::Other],
        _ => vec![FileType::Document],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    attribute: String,
    direction: Direction,
}

impl SortOrder {
    /// Parse `attribute-asc` / `attribute-desc`. Anything else yields the
    /// default (`$createdAt-desc`).
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let parsed = value
            .trim()
            .rsplit_once('-')
            .and_then(|(attribute, direction)| {
                let direction = match direction {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    _ => return None,
                };
                (!attribute.is_empty()).then(|| Self {
                    attribute: attribute.to_string(),
                    direction,
                })
            });

        parsed.unwrap_or_default()
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn query(&self) -> Query {
        match self.direction {
            Direction::Asc => Query::order_asc(&self.attribute),
            Direction::Desc => Query::order_desc(&self.attribute),
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            attribute: "$createdAt".to_string(),
            direction: Direction::Desc,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FileListRequest {
    pub types: Vec<FileType>,
    pub search_text: String,
    pub sort: SortOrder,
    pub limit: Option<u32>,
}

impl FileListRequest {
    /// Request for a route segment plus the raw `query` and `sort` parameters.
    #[must_use]
    pub fn from_route(segment: &str, search_text: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            types: file_types_for(segment),
            search_text: search_text.unwrap_or_default().trim().to_string(),
            sort: SortOrder::parse(sort.unwrap_or(DEFAULT_SORT)),
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Files owned by or shared with `user`, narrowed by type and search text.
    #[must_use]
    pub fn queries(&self, user: &UserRecord) -> Vec<Query> {
        let mut queries = vec![Query::or(vec![
            Query::equal("owner", [user.id.as_str()]),
            Query::contains("users", [user.email.as_str()]),
        ])];

        if !self.types.is_empty() {
            queries.push(Query::equal(
                "type",
                self.types.iter().map(|file_type| file_type.as_str()),
            ));
        }

        if !self.search_text.is_empty() {
            queries.push(Query::contains("name", [self.search_text.as_str()]));
        }

        if let Some(limit) = self.limit {
            queries.push(Query::limit(limit));
        }

        queries.push(self.sort.query());

        queries
    }
}

/// Page title for a route segment, e.g. `media` -> `Media`.
#[must_use]
pub fn title_for(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// List the files visible to `user`.
///
/// # Errors
/// Returns the provider error if the query fails or a document cannot be decoded.
#[instrument(skip(backend, user, request), fields(user = %user.id))]
pub async fn list_files<B: Backend>(
    backend: &B,
    collection_id: &str,
    segment: &str,
    user: &UserRecord,
    request: &FileListRequest,
) -> ProviderResult<FilesPage> {
    let list = backend
        .list_documents(Scope::Admin, collection_id, &request.queries(user))
        .await?;

    let total = list.total;
    let files: Vec<FileRecord> = list.into_typed()?;
    let total_size_bytes = files.iter().map(|file| file.size).sum();

    debug!(total, returned = files.len(), "files listed");

    Ok(FilesPage {
        title: title_for(segment),
        total,
        total_size_bytes,
        files,
    })
}
