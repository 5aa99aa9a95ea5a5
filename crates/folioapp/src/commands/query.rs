//! Read-side queries over merged lists.
//!
//! These take an already merged `Vec` and never touch the store: the caller
//! decides which remote snapshot to merge against, then narrows the result here.
//!
//! - [`apply_query`] drives the document listing: status filter, text search,
//!   sort, then pagination.
//! - [`search_all`] drives the combined search over documents and collections,
//!   with the extra document-only filters (status, author, date range).

use crate::commands::helpers::text_filter;
use crate::merge::sort_recent_first;
use crate::model::{Collection, Document, DocumentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(DocumentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: DocumentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most recently updated first.
    #[default]
    Recent,
    Oldest,
    /// Case-insensitive by title, ties broken by recency.
    Title,
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortOption::Recent => "recent",
            SortOption::Oldest => "oldest",
            SortOption::Title => "title",
        };
        f.write_str(label)
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortOption::Recent),
            "oldest" => Ok(SortOption::Oldest),
            "title" => Ok(SortOption::Title),
            _ => Err(format!(
                "unknown sort '{}' (expected recent, oldest or title)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentQuery {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: SortOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            sort: SortOption::Recent,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Page and limit of zero are clamped to one. There is always at least one
    /// page, even when `total` is zero.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit).max(1);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub fn sort_documents(docs: &mut [Document], sort: SortOption) {
    match sort {
        SortOption::Recent => sort_recent_first(docs),
        SortOption::Oldest => docs.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        SortOption::Title => docs.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        }),
    }
}

pub fn apply_query(docs: Vec<Document>, query: &DocumentQuery) -> Page<Document> {
    let mut docs: Vec<Document> = docs
        .into_iter()
        .filter(|doc| query.status.matches(doc.status))
        .collect();
    if let Some(needle) = &query.search {
        docs = text_filter(docs, needle);
    }
    sort_documents(&mut docs, query.sort);

    let pagination = Pagination::new(query.page, query.limit, docs.len());
    let items = docs.drain(pagination.range()).collect();
    Page { items, pagination }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub status: StatusFilter,
    /// Exact author name, compared case-insensitively. `None` or `"all"`
    /// disables the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Inclusive lower bound on `updated_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `updated_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    fn author_filter(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("all"))
    }

    fn accepts(&self, doc: &Document) -> bool {
        if !self.status.matches(doc.status) {
            return false;
        }
        if let Some(author) = self.author_filter() {
            if !doc.author.eq_ignore_ascii_case(author) {
                return false;
            }
        }
        if self.date_from.is_some_and(|from| doc.updated_at < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| doc.updated_at > to) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub documents: Vec<Document>,
    pub collections: Vec<Collection>,
    pub total_results: usize,
}

/// Text search over both kinds. Status, author and date filters narrow
/// documents only.
pub fn search_all(
    docs: Vec<Document>,
    collections: Vec<Collection>,
    request: &SearchRequest,
) -> SearchResults {
    let mut documents: Vec<Document> = text_filter(docs, &request.query)
        .into_iter()
        .filter(|doc| request.accepts(doc))
        .collect();
    let mut collections = text_filter(collections, &request.query);

    sort_recent_first(&mut documents);
    sort_recent_first(&mut collections);

    let total_results = documents.len() + collections.len();
    SearchResults {
        documents,
        collections,
        total_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, CollectionPatch, DocumentPatch};
    use crate::test_utils::t0;
    use chrono::Duration;

    fn doc(id: i64, title: &str, status: DocumentStatus, author: &str, hours_ago: i64) -> Document {
        Document::from_patch(
            id,
            DocumentPatch::titled(title).with_status(status),
            &Author::new(author, "XX"),
            t0() - Duration::hours(hours_ago),
        )
    }

    fn fixture() -> Vec<Document> {
        vec![
            doc(1, "API Integration Guidelines", DocumentStatus::Published, "Sarah Chen", 2),
            doc(2, "Q4 Product Roadmap", DocumentStatus::Draft, "Mike Johnson", 5),
            doc(3, "user research summary", DocumentStatus::InReview, "Alex Morgan", 1),
            doc(4, "Design System", DocumentStatus::Published, "Sarah Chen", 48),
        ]
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
        items.iter().map(id).collect()
    }

    #[test]
    fn default_query_sorts_recent_first() {
        let page = apply_query(fixture(), &DocumentQuery::default());
        assert_eq!(ids(&page.items, |d| d.id), vec![3, 1, 2, 4]);
        assert_eq!(page.pagination.total, 4);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next);
        assert!(!page.pagination.has_prev);
    }

    #[test]
    fn status_filter_and_oldest_sort() {
        let query = DocumentQuery {
            status: StatusFilter::Only(DocumentStatus::Published),
            sort: SortOption::Oldest,
            ..Default::default()
        };
        let page = apply_query(fixture(), &query);
        assert_eq!(ids(&page.items, |d| d.id), vec![4, 1]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let query = DocumentQuery {
            sort: SortOption::Title,
            ..Default::default()
        };
        let page = apply_query(fixture(), &query);
        assert_eq!(ids(&page.items, |d| d.id), vec![1, 4, 2, 3]);
    }

    #[test]
    fn pagination_slices_and_flags() {
        let query = DocumentQuery {
            page: 2,
            limit: 3,
            ..Default::default()
        };
        let page = apply_query(fixture(), &query);
        assert_eq!(ids(&page.items, |d| d.id), vec![4]);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn page_past_end_is_empty_and_zero_is_clamped() {
        let past = DocumentQuery {
            page: 9,
            ..Default::default()
        };
        assert!(apply_query(fixture(), &past).items.is_empty());

        let zero = DocumentQuery {
            page: 0,
            limit: 0,
            ..Default::default()
        };
        let page = apply_query(fixture(), &zero);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 1);
        assert_eq!(page.items.len(), 1);
        assert!(page.pagination.has_next);
    }

    #[test]
    fn empty_list_has_one_page() {
        let page = apply_query(Vec::new(), &DocumentQuery::default());
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn search_applies_document_filters() {
        let cols = vec![
            Collection::from_patch(
                10,
                CollectionPatch::named("Engineering").with_description("API docs"),
                t0(),
            ),
            Collection::from_patch(11, CollectionPatch::named("Design"), t0()),
        ];
        let request = SearchRequest {
            query: "a".into(),
            author: Some("sarah chen".into()),
            date_from: Some(t0() - Duration::hours(24)),
            ..Default::default()
        };
        let results = search_all(fixture(), cols, &request);
        assert_eq!(ids(&results.documents, |d| d.id), vec![1]);
        assert_eq!(ids(&results.collections, |c| c.id), vec![10]);
        assert_eq!(results.total_results, 2);
    }

    #[test]
    fn search_author_all_is_no_filter() {
        let request = SearchRequest {
            author: Some("all".into()),
            date_to: Some(t0() - Duration::hours(2)),
            ..Default::default()
        };
        let results = search_all(fixture(), Vec::new(), &request);
        assert_eq!(ids(&results.documents, |d| d.id), vec![1, 2, 4]);
    }

    #[test]
    fn filters_parse_and_serialize() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "draft".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(DocumentStatus::Draft))
        );
        let json = serde_json::to_string(&StatusFilter::Only(DocumentStatus::InReview)).unwrap();
        assert_eq!(json, "\"In Review\"");
        assert_eq!("TITLE".parse::<SortOption>(), Ok(SortOption::Title));
        assert!("newest".parse::<SortOption>().is_err());
    }
}
