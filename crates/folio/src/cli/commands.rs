//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: data dir, config, store and remote source via
//!    [`folioapp::init::initialize`]
//! 3. **Dispatch**: one handler per command
//! 4. **Output**: `render` for text, `serde_json` for `--json`
//! 5. **Errors**: `anyhow` up to `main`, which prints them and exits 1

use super::render;
use super::setup::{
    Cli, CollectionsCommands, Commands, DocsCommands, ListArgs, PrefsArgs, PrefsCommands,
    SearchArgs,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use folioapp::commands::activity::ActivityFilter;
use folioapp::commands::query::{DocumentQuery, SearchRequest};
use folioapp::commands::UpdateOutcome;
use folioapp::init::{initialize, FolioContext};
use folioapp::model::{Document, Record};
use folioapp::preferences::{DocumentFilters, Preferences, UserProfile, ViewPreferences};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FOLIO_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = initialize(cli.data.clone()).context("failed to initialize folio")?;
    let mut runner = Runner {
        ctx,
        json: cli.json,
        now: Utc::now(),
    };
    debug!(command = ?cli.command, json = cli.json, "dispatching");

    match cli.command {
        None => runner.list_documents(ListArgs::default()),
        Some(Commands::Docs { command }) => runner.docs(command),
        Some(Commands::Collections { command }) => runner.collections(command),
        Some(Commands::Activity { kind }) => runner.activity(kind),
        Some(Commands::Search(args)) => runner.search(args),
        Some(Commands::Prefs { command }) => runner.prefs(command),
        Some(Commands::Reset) => runner.reset(),
    }
}

/// Logs go to stderr. `FOLIO_LOG` takes an `EnvFilter` directive; without it
/// the level is `warn`, or `debug` with `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct Runner {
    ctx: FolioContext,
    json: bool,
    now: DateTime<Utc>,
}

impl Runner {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    fn remote_documents(&self) -> Result<Vec<Document>> {
        self.ctx
            .remote
            .fetch_documents()
            .context("failed to fetch remote documents")
    }

    fn merged_documents(&self) -> Result<Vec<Document>> {
        Ok(self.ctx.api.merge_documents(self.remote_documents()?))
    }

    fn merged_collections(&self) -> Result<Vec<folioapp::model::Collection>> {
        let remote = self
            .ctx
            .remote
            .fetch_collections()
            .context("failed to fetch remote collections")?;
        Ok(self.ctx.api.merge_collections(remote))
    }

    fn report_outcome<R: Record + Serialize>(
        &self,
        outcome: &UpdateOutcome<R>,
        label: &str,
    ) -> Result<()> {
        let id = outcome.record().id();
        self.emit(outcome, || match outcome {
            UpdateOutcome::Updated(_) => render::success(&format!("Updated {} {}", label, id)),
            UpdateOutcome::Created(_) => render::warning(&format!(
                "{} {} was not in the local overlay; created a local copy from the given fields",
                label, id
            )),
        })
    }

    // --- docs ---

    fn docs(&mut self, command: Option<DocsCommands>) -> Result<()> {
        match command.unwrap_or(DocsCommands::List(ListArgs::default())) {
            DocsCommands::List(args) => self.list_documents(args),
            DocsCommands::Show { id } => {
                let doc = self.ctx.api.get_document(self.remote_documents()?, id)?;
                self.emit(&doc, || render::document_detail(&doc, self.now))
            }
            DocsCommands::Create(fields) => {
                let doc = self.ctx.api.create_local_document(fields.into());
                self.emit(&doc, || {
                    render::success(&format!("Created document {}: {}", doc.id, doc.title))
                })
            }
            DocsCommands::Update { id, fields } => {
                let outcome = self.ctx.api.update_local_document(id, fields.into());
                self.report_outcome(&outcome, "Document")
            }
            DocsCommands::Delete { id } => {
                if !self.ctx.api.delete_local_document(id) {
                    bail!("Document {} is not in the local overlay", id);
                }
                self.emit(&serde_json::json!({ "deleted": id }), || {
                    render::success(&format!("Deleted document {}", id))
                })
            }
        }
    }

    fn list_documents(&mut self, args: ListArgs) -> Result<()> {
        let query = DocumentQuery {
            status: args.status,
            sort: args.sort,
            search: args.search,
            page: args.page,
            limit: args.limit,
        };
        let page = self.ctx.api.query_documents(self.merged_documents()?, &query);
        self.emit(&page, || render::document_page(&page, self.now))
    }

    // --- collections ---

    fn collections(&mut self, command: Option<CollectionsCommands>) -> Result<()> {
        match command.unwrap_or(CollectionsCommands::List { search: None }) {
            CollectionsCommands::List { search } => {
                let merged = self.merged_collections()?;
                let cols = match search {
                    Some(q) => self.ctx.api.search_collections(merged, &q),
                    None => merged,
                };
                self.emit(&cols, || render::collection_list(&cols, self.now))
            }
            CollectionsCommands::Show { id } => {
                let remote = self
                    .ctx
                    .remote
                    .fetch_collections()
                    .context("failed to fetch remote collections")?;
                let col = self.ctx.api.get_collection(remote, id)?;
                self.emit(&col, || render::collection_detail(&col, self.now))
            }
            CollectionsCommands::Create(fields) => {
                let col = self.ctx.api.create_local_collection(fields.into());
                self.emit(&col, || {
                    render::success(&format!("Created collection {}: {}", col.id, col.name))
                })
            }
            CollectionsCommands::Update { id, fields } => {
                let outcome = self.ctx.api.update_local_collection(id, fields.into());
                self.report_outcome(&outcome, "Collection")
            }
            CollectionsCommands::Delete { id } => {
                if !self.ctx.api.delete_local_collection(id) {
                    bail!("Collection {} is not in the local overlay", id);
                }
                self.emit(&serde_json::json!({ "deleted": id }), || {
                    render::success(&format!("Deleted collection {}", id))
                })
            }
        }
    }

    // --- activity, search ---

    fn activity(&mut self, filter: ActivityFilter) -> Result<()> {
        let remote = self
            .ctx
            .remote
            .fetch_activities()
            .context("failed to fetch remote activity")?;
        let feed = self.ctx.api.merge_activities(remote);
        let feed = self.ctx.api.filter_activities(feed, filter);
        self.emit(&feed, || render::activity_feed(&feed, self.now))
    }

    fn search(&mut self, args: SearchArgs) -> Result<()> {
        let request = SearchRequest {
            query: args.query,
            status: args.status,
            author: args.author,
            date_from: args.from,
            date_to: args.to,
        };
        let results = self.ctx.api.search(
            self.merged_documents()?,
            self.merged_collections()?,
            &request,
        );
        self.emit(&results, || render::search_results(&results, self.now))
    }

    // --- prefs, reset ---

    fn prefs(&mut self, command: Option<PrefsCommands>) -> Result<()> {
        match command.unwrap_or(PrefsCommands::Show) {
            PrefsCommands::Show => {
                let prefs = self.ctx.api.load_preferences();
                println!("{}", serde_json::to_string_pretty(&prefs)?);
                Ok(())
            }
            PrefsCommands::Set(args) => {
                let patch = prefs_patch(args);
                if patch.is_empty() {
                    bail!("Nothing to set; pass at least one preference flag");
                }
                let prefs = self.ctx.api.save_preferences(patch);
                self.emit(&prefs, || render::success("Preferences saved"))
            }
            PrefsCommands::Clear => {
                self.ctx.api.clear_preferences();
                self.emit(&serde_json::json!({ "cleared": true }), || {
                    render::success("Preferences cleared")
                })
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.ctx.api.reset();
        let location = self.ctx.data_dir.display().to_string();
        self.emit(&serde_json::json!({ "reset": location }), || {
            render::success(&format!("Cleared local data in {}", location))
        })
    }
}

fn prefs_patch(args: PrefsArgs) -> Preferences {
    let filters = DocumentFilters {
        status: args.status,
        sort: args.sort,
    };
    let view = ViewPreferences {
        documents_view_mode: args.view,
        theme: args.theme,
    };
    let profile = UserProfile {
        initials: args.initials,
    };
    Preferences {
        selected_document_id: args.document,
        selected_collection_id: args.collection,
        document_filters: (filters != DocumentFilters::default()).then_some(filters),
        sidebar_collapsed: args.sidebar_collapsed,
        view_preferences: (view != ViewPreferences::default()).then_some(view),
        user_profile: (profile != UserProfile::default()).then_some(profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folioapp::commands::query::SortOption;
    use folioapp::preferences::Theme;

    #[test]
    fn prefs_patch_only_sets_given_groups() {
        let patch = prefs_patch(PrefsArgs {
            theme: Some(Theme::Dark),
            sort: Some(SortOption::Oldest),
            ..Default::default()
        });
        assert_eq!(patch.view_preferences.unwrap().theme, Some(Theme::Dark));
        assert_eq!(patch.document_filters.unwrap().sort, Some(SortOption::Oldest));
        assert!(patch.user_profile.is_none());
        assert!(patch.selected_document_id.is_none());
    }

    #[test]
    fn empty_prefs_args_make_empty_patch() {
        assert!(prefs_patch(PrefsArgs::default()).is_empty());
    }
}
