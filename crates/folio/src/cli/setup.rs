use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use folioapp::commands::activity::ActivityFilter;
use folioapp::commands::query::{SortOption, StatusFilter, DEFAULT_LIMIT, DEFAULT_PAGE};
use folioapp::model::{CollectionPatch, DocumentPatch, DocumentStatus};
use folioapp::preferences::{Theme, ViewMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    bin_name = "folio",
    version,
    disable_help_subcommand = true,
    after_help = "Remote data comes from the built-in demo set unless `snapshot_dir` is configured.\nLocal edits live in the data directory and always win over remote records."
)]
#[command(about = "Knowledge-base documents, collections and activity, with a local overlay", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (overrides FOLIO_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Documents: list, show, create, update, delete
    #[command(alias = "d", display_order = 1)]
    Docs {
        #[command(subcommand)]
        command: Option<DocsCommands>,
    },

    /// Collections: list, show, create, update, delete
    #[command(alias = "c", display_order = 2)]
    Collections {
        #[command(subcommand)]
        command: Option<CollectionsCommands>,
    },

    /// Show the activity feed
    #[command(alias = "a", display_order = 3)]
    Activity {
        /// Only show one kind of activity (all, created, updated, published, commented)
        #[arg(long = "type", short = 't', default_value = "all")]
        kind: ActivityFilter,
    },

    /// Search documents and collections
    #[command(alias = "s", display_order = 4)]
    Search(SearchArgs),

    /// Show or change UI preferences
    #[command(display_order = 5)]
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommands>,
    },

    /// Drop every local edit, activity entry and preference
    #[command(display_order = 6)]
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum DocsCommands {
    /// List documents (merged view)
    #[command(alias = "ls", display_order = 1)]
    List(ListArgs),

    /// Show one document
    #[command(alias = "v", display_order = 2)]
    Show { id: i64 },

    /// Create a local document
    #[command(alias = "n", display_order = 3)]
    Create(DocFields),

    /// Update a document (creates a local copy when it is not local yet)
    #[command(alias = "e", display_order = 4)]
    Update {
        id: i64,
        #[command(flatten)]
        fields: DocFields,
    },

    /// Delete a local document
    #[command(alias = "rm", display_order = 5)]
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status (all, published, draft, in-review)
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Sort order (recent, oldest, title)
    #[arg(long, default_value = "recent")]
    pub sort: SortOption,

    /// Only documents whose title, snippet or body contain this text
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

impl Default for ListArgs {
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

#[derive(Args, Debug, Default)]
pub struct DocFields {
    #[arg(long)]
    pub title: Option<String>,

    /// HTML body
    #[arg(long)]
    pub body: Option<String>,

    /// Preview text (derived from the body when omitted)
    #[arg(long)]
    pub snippet: Option<String>,

    /// published, draft or in-review
    #[arg(long)]
    pub status: Option<DocumentStatus>,

    /// Id of the collection the document belongs to
    #[arg(long, value_name = "ID")]
    pub collection: Option<i64>,
}

impl From<DocFields> for DocumentPatch {
    fn from(fields: DocFields) -> Self {
        DocumentPatch {
            title: fields.title,
            body: fields.body,
            snippet: fields.snippet,
            status: fields.status,
            collection_id: fields.collection,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CollectionsCommands {
    /// List collections (merged view)
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only collections whose name or description contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one collection
    #[command(alias = "v", display_order = 2)]
    Show { id: i64 },

    /// Create a local collection
    #[command(alias = "n", display_order = 3)]
    Create(CollectionFields),

    /// Update a collection (creates a local copy when it is not local yet)
    #[command(alias = "e", display_order = 4)]
    Update {
        id: i64,
        #[command(flatten)]
        fields: CollectionFields,
    },

    /// Delete a local collection
    #[command(alias = "rm", display_order = 5)]
    Delete { id: i64 },
}

#[derive(Args, Debug, Default)]
pub struct CollectionFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Emoji shown next to the name
    #[arg(long)]
    pub icon: Option<String>,
}

impl From<CollectionFields> for CollectionPatch {
    fn from(fields: CollectionFields) -> Self {
        CollectionPatch {
            name: fields.name,
            description: fields.description,
            icon: fields.icon,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Text to look for (blank matches everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Filter documents by status (all, published, draft, in-review)
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Filter documents by exact author name
    #[arg(long)]
    pub author: Option<String>,

    /// Documents updated at or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<DateTime<Utc>>,

    /// Documents updated at or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Print stored preferences
    #[command(display_order = 1)]
    Show,

    /// Change preferences (only the given fields are touched)
    #[command(display_order = 2)]
    Set(PrefsArgs),

    /// Remove all stored preferences
    #[command(display_order = 3)]
    Clear,
}

#[derive(Args, Debug, Default)]
pub struct PrefsArgs {
    /// light or dark
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Document view mode: list or grid
    #[arg(long)]
    pub view: Option<ViewMode>,

    #[arg(long, value_name = "BOOL")]
    pub sidebar_collapsed: Option<bool>,

    #[arg(long)]
    pub initials: Option<String>,

    /// Selected document id
    #[arg(long, value_name = "ID")]
    pub document: Option<i64>,

    /// Selected collection id
    #[arg(long, value_name = "ID")]
    pub collection: Option<i64>,

    /// Default status filter for document lists
    #[arg(long)]
    pub status: Option<StatusFilter>,

    /// Default sort for document lists
    #[arg(long)]
    pub sort: Option<SortOption>,
}

/// Accepts RFC 3339 timestamps or plain dates (midnight UTC).
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD or RFC 3339)", s))
}
