use crate::commands::activity::{self, Subject};
use crate::commands::helpers::{next_id, text_filter};
use crate::commands::{CmdContext, UpdateOutcome};
use crate::merge;
use crate::model::{ActivityAction, Document, DocumentPatch};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use crate::store::StoreKey;
use tracing::debug;

const KEY: StoreKey = StoreKey::Documents;

/// Every document in the local overlay, in stored order.
pub fn list_local<B: StorageBackend>(store: &LocalStore<B>) -> Vec<Document> {
    store.load(KEY)
}

pub fn get_local<B: StorageBackend>(store: &LocalStore<B>, id: i64) -> Option<Document> {
    list_local(store).into_iter().find(|doc| doc.id == id)
}

/// Remote snapshot overlaid with local documents, most recently updated first.
pub fn merge<B: StorageBackend>(store: &LocalStore<B>, remote: Vec<Document>) -> Vec<Document> {
    merge::merge(remote, list_local(store))
}

pub fn create<B: StorageBackend>(ctx: &CmdContext<'_, B>, patch: DocumentPatch) -> Document {
    let mut docs = list_local(ctx.store);
    let now = ctx.clock.now();
    let id = next_id(docs.iter().map(|doc| doc.id), now);

    // A fresh record is created now, whatever the patch says.
    let patch = DocumentPatch {
        created_at: None,
        ..patch
    };
    let doc = Document::from_patch(id, patch, ctx.author, now);
    docs.push(doc.clone());
    ctx.store.save(KEY, &docs);

    activity::record(ctx, ActivityAction::Created, Subject::Document(&doc));
    debug!(id, title = %doc.title, "created local document");
    doc
}

/// Merges `patch` onto the local document `id`, or synthesizes one with that
/// id when the overlay does not have it.
pub fn update<B: StorageBackend>(
    ctx: &CmdContext<'_, B>,
    id: i64,
    patch: DocumentPatch,
) -> UpdateOutcome<Document> {
    let mut docs = list_local(ctx.store);
    let now = ctx.clock.now();
    let action = if patch.publishes() {
        ActivityAction::Published
    } else {
        ActivityAction::Updated
    };

    let outcome = match docs.iter().position(|doc| doc.id == id) {
        Some(idx) => {
            docs[idx].apply(patch, now);
            UpdateOutcome::Updated(docs[idx].clone())
        }
        None => {
            let doc = Document::from_patch(id, patch, ctx.author, now);
            docs.push(doc.clone());
            UpdateOutcome::Created(doc)
        }
    };
    ctx.store.save(KEY, &docs);

    activity::record(ctx, action, Subject::Document(outcome.record()));
    debug!(id, created = outcome.was_created(), "updated local document");
    outcome
}

/// Removes `id` from the overlay. Returns false when the overlay had no such
/// document, even if the remote snapshot does.
pub fn delete<B: StorageBackend>(store: &LocalStore<B>, id: i64) -> bool {
    let mut docs = list_local(store);
    let before = docs.len();
    docs.retain(|doc| doc.id != id);

    if docs.len() == before {
        debug!(id, "document not found in local overlay");
        return false;
    }
    store.save(KEY, &docs);
    debug!(id, "deleted local document");
    true
}

pub fn clear<B: StorageBackend>(store: &LocalStore<B>) {
    store.clear(KEY);
}

/// Case-insensitive match on title, snippet or body.
pub fn search(documents: Vec<Document>, query: &str) -> Vec<Document> {
    text_filter(documents, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityItem, Author, DocumentStatus, UNTITLED_DOCUMENT};
    use crate::test_utils::{t0, TestEnv};
    use chrono::Duration;

    fn activities(env: &TestEnv) -> Vec<ActivityItem> {
        activity::list_local(&env.store)
    }

    fn remote_doc(id: i64, title: &str, body: &str) -> Document {
        Document::from_patch(
            id,
            DocumentPatch::titled(title).with_body(body),
            &Author::new("Sarah Chen", "SC"),
            t0() - Duration::days(1),
        )
    }

    #[test]
    fn create_then_get_returns_equal_record() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("X"));

        assert_eq!(doc.id, t0().timestamp_millis());
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.views, 0);
        assert_eq!(doc.created_at, Some(doc.updated_at));
        assert_eq!(doc.author, "Dana Kim");
        assert_eq!(get_local(&env.store, doc.id), Some(doc));
    }

    #[test]
    fn create_ignores_created_at_in_patch() {
        let env = TestEnv::new();
        let patch = DocumentPatch {
            created_at: Some(t0() - Duration::days(30)),
            ..DocumentPatch::titled("X")
        };
        let doc = create(&env.ctx(), patch);

        assert_eq!(doc.created_at, Some(t0()));
        assert_eq!(doc.created_at, Some(doc.updated_at));
    }

    #[test]
    fn create_after_max_id_does_not_overflow() {
        let env = TestEnv::new();
        update(&env.ctx(), i64::MAX, DocumentPatch::titled("max"));
        let doc = create(&env.ctx(), DocumentPatch::titled("after"));

        assert_eq!(doc.id, 1);
        assert_eq!(list_local(&env.store).len(), 2);
    }

    #[test]
    fn update_with_blank_body_keeps_body() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("X").with_body("<p>Kept</p>"));
        let outcome = update(
            &env.ctx(),
            doc.id,
            DocumentPatch {
                body: Some("   ".into()),
                ..Default::default()
            },
        );

        assert_eq!(outcome.record().body, "<p>Kept</p>");
        assert_eq!(outcome.record().snippet, "Kept");
    }

    #[test]
    fn create_emits_one_created_activity() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("Runbook"));

        let items = activities(&env);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].action, ActivityAction::Created);
        assert_eq!(items[0].document_id, Some(doc.id));
        assert_eq!(items[0].document_title, "Runbook");
        assert_eq!(items[0].timestamp, t0());
    }

    #[test]
    fn creates_in_same_millisecond_get_distinct_ids() {
        let env = TestEnv::new();
        let a = create(&env.ctx(), DocumentPatch::titled("a"));
        let b = create(&env.ctx(), DocumentPatch::titled("b"));
        assert_ne!(a.id, b.id);

        let ids: Vec<i64> = activities(&env).iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn update_preserves_created_at() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("X"));
        env.advance_minutes(30);

        let outcome = update(&env.ctx(), doc.id, DocumentPatch::titled("Y"));
        assert!(!outcome.was_created());
        let updated = outcome.into_record();
        assert_eq!(updated.title, "Y");
        assert_eq!(updated.created_at, Some(t0()));
        assert_eq!(updated.updated_at, t0() + Duration::minutes(30));
        assert_eq!(get_local(&env.store, doc.id), Some(updated));
    }

    #[test]
    fn update_unknown_id_upserts_with_defaults() {
        let env = TestEnv::new();
        let outcome = update(&env.ctx(), 999, DocumentPatch::titled("Z"));

        assert!(outcome.was_created());
        let doc = outcome.record();
        assert_eq!(doc.id, 999);
        assert_eq!(doc.title, "Z");
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.views, 0);
        assert_eq!(list_local(&env.store).len(), 1);

        let items = activities(&env);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].action, ActivityAction::Updated);
        assert_eq!(items[0].document_id, Some(999));
    }

    #[test]
    fn publishing_update_emits_published_activity() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("Draft post"));
        env.advance_minutes(1);
        update(
            &env.ctx(),
            doc.id,
            DocumentPatch::default().with_status(DocumentStatus::Published),
        );

        let items = activities(&env);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].action, ActivityAction::Published);
        assert_eq!(items[1].document_id, Some(doc.id));
    }

    #[test]
    fn delete_removes_and_emits_nothing() {
        let env = TestEnv::new();
        let doc = create(&env.ctx(), DocumentPatch::titled("gone"));
        assert!(delete(&env.store, doc.id));
        assert_eq!(get_local(&env.store, doc.id), None);
        assert_eq!(activities(&env).len(), 1);
    }

    #[test]
    fn delete_remote_only_is_not_found() {
        let env = TestEnv::new();
        let remote = vec![remote_doc(3, "Remote", "<p>body</p>")];
        assert!(!delete(&env.store, 3));
        assert_eq!(merge(&env.store, remote).len(), 1);
        assert!(activities(&env).is_empty());
    }

    #[test]
    fn merge_overlays_local_edits() {
        let env = TestEnv::new();
        let remote = vec![
            remote_doc(1, "API Integration Guidelines", "<p>REST</p>"),
            remote_doc(2, "Roadmap", "<p>Q4</p>"),
        ];
        update(&env.ctx(), 1, DocumentPatch::titled("API Guidelines v2"));

        let merged = merge(&env.store, remote);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, 1);
        assert_eq!(merged[0].title, "API Guidelines v2");
    }

    #[test]
    fn corrupt_overlay_reads_as_empty() {
        let env = TestEnv::new();
        env.backend().put_raw(StoreKey::Documents, "[{\"id\": oops");
        assert!(list_local(&env.store).is_empty());
        assert_eq!(get_local(&env.store, 1), None);

        let doc = create(&env.ctx(), DocumentPatch::default());
        assert_eq!(doc.title, UNTITLED_DOCUMENT);
        assert_eq!(list_local(&env.store).len(), 1);
    }

    #[test]
    fn unavailable_store_still_returns_record() {
        let env = TestEnv::new();
        env.backend().set_simulate_write_error(true);
        let doc = create(&env.ctx(), DocumentPatch::titled("ephemeral"));
        assert_eq!(doc.title, "ephemeral");
        assert_eq!(get_local(&env.store, doc.id), None);
    }

    #[test]
    fn search_matches_title_snippet_or_body() {
        let docs = vec![
            remote_doc(1, "API Integration", "<p>rest</p>"),
            remote_doc(2, "Roadmap", "<p>Public api keys</p>"),
            remote_doc(3, "Design System", "<p>tokens</p>"),
        ];
        let found = search(docs.clone(), "api");
        let ids: Vec<i64> = found.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(search(docs.clone(), ""), docs);
        assert_eq!(search(docs.clone(), "   "), docs);
    }

    #[test]
    fn clear_drops_overlay() {
        let env = TestEnv::new();
        create(&env.ctx(), DocumentPatch::titled("temp"));
        clear(&env.store);
        assert!(list_local(&env.store).is_empty());
    }
}
