//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every folio operation, whatever the client.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the store, the clock and the acting author
//! - **Dispatches** to the matching command function
//! - **Turns lookups into errors** where a client needs one
//!   ([`FolioApi::get_document`], [`FolioApi::get_collection`])
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Fetch remote snapshots**: callers pass them in, usually from a
//!   [`crate::remote::RemoteSource`]
//! - **Presentation**: returns data structures, not strings
//!
//! ## Generic Over Backend and Clock
//!
//! `FolioApi<B: StorageBackend, C: Clock>`:
//! - Production: `FolioApi<FsBackend, SystemClock>`
//! - Testing: `FolioApi<MemBackend, ManualClock>`

use crate::clock::{Clock, SystemClock};
use crate::commands::activity::{self, ActivityFilter};
use crate::commands::query::{self, DocumentQuery, Page, SearchRequest, SearchResults};
use crate::commands::{collections, documents, CmdContext, UpdateOutcome};
use crate::error::{FolioError, Result};
use crate::model::{
    ActivityItem, Author, Collection, CollectionPatch, Document, DocumentPatch, Record,
};
use crate::preferences::{self, Preferences};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use tracing::info;

pub struct FolioApi<B: StorageBackend, C: Clock = SystemClock> {
    store: LocalStore<B>,
    clock: C,
    author: Author,
}

impl<B: StorageBackend, C: Clock> FolioApi<B, C> {
    pub fn new(backend: B, clock: C, author: Author) -> Self {
        Self {
            store: LocalStore::with_backend(backend),
            clock,
            author,
        }
    }

    pub fn store(&self) -> &LocalStore<B> {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    fn ctx(&self) -> CmdContext<'_, B> {
        CmdContext::new(&self.store, &self.clock, &self.author)
    }

    // --- Documents ---

    pub fn merge_documents(&self, remote: Vec<Document>) -> Vec<Document> {
        documents::merge(&self.store, remote)
    }

    pub fn list_local_documents(&self) -> Vec<Document> {
        documents::list_local(&self.store)
    }

    pub fn get_local_document(&self, id: i64) -> Option<Document> {
        documents::get_local(&self.store, id)
    }

    /// Looks `id` up in the merged view of `remote` and the overlay.
    pub fn get_document(&self, remote: Vec<Document>, id: i64) -> Result<Document> {
        find_or_not_found(self.merge_documents(remote), id)
    }

    pub fn create_local_document(&mut self, patch: DocumentPatch) -> Document {
        documents::create(&self.ctx(), patch)
    }

    pub fn update_local_document(&mut self, id: i64, patch: DocumentPatch) -> UpdateOutcome<Document> {
        documents::update(&self.ctx(), id, patch)
    }

    pub fn delete_local_document(&mut self, id: i64) -> bool {
        documents::delete(&self.store, id)
    }

    pub fn search_documents(&self, docs: Vec<Document>, query: &str) -> Vec<Document> {
        documents::search(docs, query)
    }

    pub fn clear_local_documents(&mut self) {
        documents::clear(&self.store)
    }

    /// Filter, sort and paginate an already merged document list.
    pub fn query_documents(&self, docs: Vec<Document>, query: &DocumentQuery) -> Page<Document> {
        query::apply_query(docs, query)
    }

    // --- Collections ---

    pub fn merge_collections(&self, remote: Vec<Collection>) -> Vec<Collection> {
        collections::merge(&self.store, remote)
    }

    pub fn list_local_collections(&self) -> Vec<Collection> {
        collections::list_local(&self.store)
    }

    pub fn get_local_collection(&self, id: i64) -> Option<Collection> {
        collections::get_local(&self.store, id)
    }

    pub fn get_collection(&self, remote: Vec<Collection>, id: i64) -> Result<Collection> {
        find_or_not_found(self.merge_collections(remote), id)
    }

    pub fn create_local_collection(&mut self, patch: CollectionPatch) -> Collection {
        collections::create(&self.ctx(), patch)
    }

    pub fn update_local_collection(
        &mut self,
        id: i64,
        patch: CollectionPatch,
    ) -> UpdateOutcome<Collection> {
        collections::update(&self.ctx(), id, patch)
    }

    pub fn delete_local_collection(&mut self, id: i64) -> bool {
        collections::delete(&self.store, id)
    }

    pub fn search_collections(&self, cols: Vec<Collection>, query: &str) -> Vec<Collection> {
        collections::search(cols, query)
    }

    pub fn clear_local_collections(&mut self) {
        collections::clear(&self.store)
    }

    // --- Activity ---

    pub fn merge_activities(&self, remote: Vec<ActivityItem>) -> Vec<ActivityItem> {
        activity::merge(&self.store, remote)
    }

    pub fn list_local_activities(&self) -> Vec<ActivityItem> {
        activity::list_local(&self.store)
    }

    pub fn filter_activities(
        &self,
        items: Vec<ActivityItem>,
        filter: ActivityFilter,
    ) -> Vec<ActivityItem> {
        activity::filter(items, filter)
    }

    pub fn clear_local_activities(&mut self) {
        activity::clear(&self.store)
    }

    // --- Search ---

    pub fn search(
        &self,
        docs: Vec<Document>,
        cols: Vec<Collection>,
        request: &SearchRequest,
    ) -> SearchResults {
        query::search_all(docs, cols, request)
    }

    // --- Preferences ---

    pub fn load_preferences(&self) -> Preferences {
        preferences::load(&self.store)
    }

    pub fn save_preferences(&mut self, patch: Preferences) -> Preferences {
        preferences::save(&self.store, patch)
    }

    pub fn clear_preferences(&mut self) {
        preferences::clear(&self.store)
    }

    /// Drops every local overlay and the preferences.
    pub fn reset(&mut self) {
        self.clear_local_documents();
        self.clear_local_collections();
        self.clear_local_activities();
        self.clear_preferences();
        info!("local overlay reset");
    }
}

fn find_or_not_found<R: Record>(records: Vec<R>, id: i64) -> Result<R> {
    records
        .into_iter()
        .find(|r| r.id() == id)
        .ok_or(FolioError::NotFound { kind: R::KIND, id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{ActivityAction, DocumentStatus, RecordKind};
    use crate::remote::SeedSource;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::t0;
    use chrono::Duration;

    fn make_api() -> FolioApi<MemBackend, ManualClock> {
        FolioApi::new(
            MemBackend::new(),
            ManualClock::new(t0()),
            Author::new("Dana Kim", "DK"),
        )
    }

    fn seed() -> SeedSource {
        SeedSource::new(t0())
    }

    #[test]
    fn create_shows_up_first_in_merged_view() {
        let mut api = make_api();
        api.clock().advance(Duration::minutes(1));
        let doc = api.create_local_document(DocumentPatch::titled("Fresh"));

        let merged = api.merge_documents(seed().documents());
        assert_eq!(merged.len(), 13);
        assert_eq!(merged[0], doc);
    }

    #[test]
    fn editing_remote_document_overrides_it() {
        let mut api = make_api();
        let outcome = api.update_local_document(
            3,
            DocumentPatch::default().with_status(DocumentStatus::Published),
        );
        assert!(outcome.was_created());

        let doc = api.get_document(seed().documents(), 3).unwrap();
        assert_eq!(doc.status, DocumentStatus::Published);
        assert_eq!(doc.title, crate::model::UNTITLED_DOCUMENT);

        let feed = api.merge_activities(seed().activities());
        assert_eq!(feed.len(), 25);
        assert_eq!(feed[0].action, ActivityAction::Published);
        assert_eq!(feed[0].document_id, Some(3));
    }

    #[test]
    fn missing_record_is_not_found_error() {
        let api = make_api();
        let err = api.get_document(seed().documents(), 404).unwrap_err();
        assert!(matches!(
            err,
            FolioError::NotFound {
                kind: RecordKind::Document,
                id: 404
            }
        ));
        assert!(api.get_collection(seed().collections(), 6).is_ok());
    }

    #[test]
    fn delete_remote_only_leaves_merged_view_intact() {
        let mut api = make_api();
        assert!(!api.delete_local_document(1));
        assert_eq!(api.merge_documents(seed().documents()).len(), 12);
    }

    #[test]
    fn query_and_search_over_merged_lists() {
        let mut api = make_api();
        api.create_local_collection(CollectionPatch::named("Research Ops"));
        let docs = api.merge_documents(seed().documents());
        let page = api.query_documents(
            docs.clone(),
            &DocumentQuery {
                limit: 5,
                ..Default::default()
            },
        );
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.pagination.total_pages, 3);

        let cols = api.merge_collections(seed().collections());
        let results = api.search(docs, cols, &SearchRequest::text("research"));
        assert_eq!(results.collections.len(), 2);
        assert_eq!(results.collections[0].name, "Research Ops");
        assert_eq!(
            results.total_results,
            results.documents.len() + results.collections.len()
        );
    }

    #[test]
    fn filter_activity_feed() {
        let api = make_api();
        let feed = api.merge_activities(seed().activities());
        let updated = api.filter_activities(feed, ActivityFilter::Only(ActivityAction::Updated));
        assert_eq!(updated.len(), 12);
    }

    #[test]
    fn reset_clears_everything() {
        let mut api = make_api();
        api.create_local_document(DocumentPatch::titled("a"));
        api.create_local_collection(CollectionPatch::named("b"));
        api.save_preferences(Preferences {
            sidebar_collapsed: Some(true),
            ..Default::default()
        });

        api.reset();
        assert!(api.list_local_documents().is_empty());
        assert!(api.list_local_collections().is_empty());
        assert!(api.list_local_activities().is_empty());
        assert!(api.load_preferences().is_empty());
    }
}
