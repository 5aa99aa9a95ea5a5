//! # Domain Model
//!
//! Three record kinds live in the knowledge base: [`Document`], [`Collection`]
//! and [`ActivityItem`]. All of them are keyed by an integer id that is unique
//! within its kind, and all of them carry a timestamp that orders merged views
//! (most recent first).
//!
//! ## Wire Format
//!
//! Records are stored and exchanged as JSON with camelCase field names, which is
//! the shape remote snapshots arrive in:
//!
//! ```text
//! {"id": 1, "title": "...", "authorInitials": "SC", "status": "In Review",
//!  "updatedAt": "2024-12-01T10:00:00Z", "views": 98}
//! ```
//!
//! Document status serializes as `"Published" | "Draft" | "In Review"`, activity
//! actions as lowercase words.
//!
//! ## Patches and Defaults
//!
//! Callers never build full records themselves. They send a [`DocumentPatch`] or
//! [`CollectionPatch`] where every field is optional, and the per-kind builder
//! ([`Document::from_patch`], [`Collection::from_patch`]) fills the gaps:
//!
//! | Kind | Field | Default |
//! |------|-------|---------|
//! | Document | `title` | `"Untitled Document"` |
//! | Document | `body` | `"<p>Start writing...</p>"` |
//! | Document | `snippet` | derived from body (first 60 characters of text) |
//! | Document | `status` | `Draft` |
//! | Collection | `name` | `"Untitled Collection"` |
//! | Collection | `icon` | `"📁"` |
//! | Collection | `contributorCount` | `1` |
//!
//! Blank strings count as missing, so an empty title becomes the default title
//! instead of an error. Validation is the caller's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::StoreKey;

pub const UNTITLED_DOCUMENT: &str = "Untitled Document";
pub const UNTITLED_COLLECTION: &str = "Untitled Collection";
pub const DEFAULT_BODY: &str = "<p>Start writing...</p>";
pub const DEFAULT_ICON: &str = "📁";
pub const DEFAULT_ICON_BG: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

/// Snippets are cut to this many characters of body text.
pub const SNIPPET_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Document,
    Collection,
    Activity,
}

impl RecordKind {
    pub fn store_key(&self) -> StoreKey {
        match self {
            RecordKind::Document => StoreKey::Documents,
            RecordKind::Collection => StoreKey::Collections,
            RecordKind::Activity => StoreKey::Activities,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Document => "Document",
            RecordKind::Collection => "Collection",
            RecordKind::Activity => "Activity",
        };
        f.write_str(name)
    }
}

/// A keyed, time-ordered record that can take part in a merge.
pub trait Record: Clone {
    const KIND: RecordKind;

    fn id(&self) -> i64;

    /// Timestamp that orders merged views, most recent first.
    fn sort_key(&self) -> DateTime<Utc>;
}

/// Records that can be matched by a free-text query.
pub trait Searchable {
    /// `needle` is already lowercased.
    fn matches_text(&self, needle: &str) -> bool;
}

// --- Document ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    Published,
    #[default]
    Draft,
    #[serde(rename = "In Review")]
    InReview,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentStatus::Published => "Published",
            DocumentStatus::Draft => "Draft",
            DocumentStatus::InReview => "In Review",
        };
        f.write_str(label)
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "published" => Ok(DocumentStatus::Published),
            "draft" => Ok(DocumentStatus::Draft),
            "inreview" | "review" => Ok(DocumentStatus::InReview),
            _ => Err(format!(
                "unknown status '{}' (expected published, draft or in-review)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub body: String,
    pub author: String,
    pub author_initials: String,
    #[serde(default)]
    pub status: DocumentStatus,
    pub updated_at: DateTime<Utc>,
    /// Missing on records that predate creation tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
}

/// Partial document: every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_initials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    /// Only honored when a record is synthesized; existing records keep theirs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentPatch {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn publishes(&self) -> bool {
        self.status == Some(DocumentStatus::Published)
    }
}

/// Who is acting when a record carries no author of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub initials: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "DK".to_string(),
            initials: "DK".to_string(),
        }
    }
}

impl Author {
    pub fn new(name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initials: initials.into(),
        }
    }
}

impl Document {
    /// Builds a full document from a patch, filling every missing field with
    /// its default. `created_at` and `updated_at` are set to `now` unless the
    /// patch carries an explicit `created_at`.
    pub fn from_patch(id: i64, patch: DocumentPatch, author: &Author, now: DateTime<Utc>) -> Self {
        let body = non_blank(patch.body).unwrap_or_else(|| DEFAULT_BODY.to_string());
        let snippet = non_blank(patch.snippet).unwrap_or_else(|| derive_snippet(&body));
        Self {
            id,
            title: non_blank(patch.title).unwrap_or_else(|| UNTITLED_DOCUMENT.to_string()),
            snippet,
            body,
            author: non_blank(patch.author).unwrap_or_else(|| author.name.clone()),
            author_initials: non_blank(patch.author_initials)
                .unwrap_or_else(|| author.initials.clone()),
            status: patch.status.unwrap_or_default(),
            updated_at: now,
            created_at: Some(patch.created_at.unwrap_or(now)),
            views: patch.views.unwrap_or(0),
            collection_id: patch.collection_id,
        }
    }

    /// Shallow merge of `patch` onto this document. `created_at` is never
    /// touched; `updated_at` becomes `now`. A new body without an explicit
    /// snippet re-derives the snippet. Blank text fields count as unset, as in
    /// [`Document::from_patch`].
    pub fn apply(&mut self, patch: DocumentPatch, now: DateTime<Utc>) {
        if let Some(title) = non_blank(patch.title) {
            self.title = title;
        }
        match (non_blank(patch.snippet), non_blank(patch.body)) {
            (Some(snippet), Some(body)) => {
                self.snippet = snippet;
                self.body = body;
            }
            (Some(snippet), None) => self.snippet = snippet,
            (None, Some(body)) => {
                self.snippet = derive_snippet(&body);
                self.body = body;
            }
            (None, None) => {}
        }
        if let Some(author) = non_blank(patch.author) {
            self.author = author;
        }
        if let Some(initials) = non_blank(patch.author_initials) {
            self.author_initials = initials;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        if patch.collection_id.is_some() {
            self.collection_id = patch.collection_id;
        }
        self.updated_at = now;
    }
}

impl Record for Document {
    const KIND: RecordKind = RecordKind::Document;

    fn id(&self) -> i64 {
        self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Searchable for Document {
    fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.snippet.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
    }
}

// --- Collection ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_bg: String,
    /// Advisory; not kept in sync with the documents that reference it.
    #[serde(default)]
    pub document_count: u32,
    #[serde(default)]
    pub contributor_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CollectionPatch {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Collection {
    pub fn from_patch(id: i64, patch: CollectionPatch, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: non_blank(patch.name).unwrap_or_else(|| UNTITLED_COLLECTION.to_string()),
            description: patch.description.unwrap_or_default(),
            icon: non_blank(patch.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            icon_bg: non_blank(patch.icon_bg).unwrap_or_else(|| DEFAULT_ICON_BG.to_string()),
            document_count: patch.document_count.unwrap_or(0),
            contributor_count: patch.contributor_count.unwrap_or(1),
            created_at: patch.created_at.unwrap_or(now),
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: CollectionPatch, now: DateTime<Utc>) {
        if let Some(name) = non_blank(patch.name) {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(icon) = non_blank(patch.icon) {
            self.icon = icon;
        }
        if let Some(icon_bg) = non_blank(patch.icon_bg) {
            self.icon_bg = icon_bg;
        }
        if let Some(count) = patch.document_count {
            self.document_count = count;
        }
        if let Some(count) = patch.contributor_count {
            self.contributor_count = count;
        }
        self.updated_at = now;
    }
}

impl Record for Collection {
    const KIND: RecordKind = RecordKind::Collection;

    fn id(&self) -> i64 {
        self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Searchable for Collection {
    fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

// --- Activity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Published,
    Commented,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Published => "published",
            ActivityAction::Commented => "commented",
        };
        f.write_str(label)
    }
}

impl FromStr for ActivityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(ActivityAction::Created),
            "updated" => Ok(ActivityAction::Updated),
            "published" => Ok(ActivityAction::Published),
            "commented" => Ok(ActivityAction::Commented),
            _ => Err(format!("unknown activity type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: i64,
    pub action: ActivityAction,
    pub author: String,
    pub author_initials: String,
    /// Denormalized label of the subject at the time of the action.
    pub document_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl Record for ActivityItem {
    const KIND: RecordKind = RecordKind::Activity;

    fn id(&self) -> i64 {
        self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// --- Helpers ---

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Plain-text preview of an HTML-ish body: tags stripped, whitespace collapsed,
/// cut to [`SNIPPET_LEN`] characters with a trailing `...` when truncated.
pub fn derive_snippet(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > SNIPPET_LEN {
        let cut: String = collapsed.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut.trim_end())
    } else {
        collapsed
    }
}
