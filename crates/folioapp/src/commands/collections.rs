use crate::commands::activity::{self, Subject};
use crate::commands::helpers::{next_id, text_filter};
use crate::commands::{CmdContext, UpdateOutcome};
use crate::merge;
use crate::model::{ActivityAction, Collection, CollectionPatch};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use crate::store::StoreKey;
use tracing::debug;

const KEY: StoreKey = StoreKey::Collections;

pub fn list_local<B: StorageBackend>(store: &LocalStore<B>) -> Vec<Collection> {
    store.load(KEY)
}

pub fn get_local<B: StorageBackend>(store: &LocalStore<B>, id: i64) -> Option<Collection> {
    list_local(store).into_iter().find(|col| col.id == id)
}

pub fn merge<B: StorageBackend>(
    store: &LocalStore<B>,
    remote: Vec<Collection>,
) -> Vec<Collection> {
    merge::merge(remote, list_local(store))
}

pub fn create<B: StorageBackend>(ctx: &CmdContext<'_, B>, patch: CollectionPatch) -> Collection {
    let mut collections = list_local(ctx.store);
    let now = ctx.clock.now();
    let id = next_id(collections.iter().map(|col| col.id), now);

    let patch = CollectionPatch {
        created_at: None,
        ..patch
    };
    let collection = Collection::from_patch(id, patch, now);
    collections.push(collection.clone());
    ctx.store.save(KEY, &collections);

    activity::record(ctx, ActivityAction::Created, Subject::Collection(&collection));
    debug!(id, name = %collection.name, "created local collection");
    collection
}

/// Same upsert contract as documents: an id missing from the overlay is
/// synthesized from the patch. Collections have no status, so the activity is
/// always `Updated`.
pub fn update<B: StorageBackend>(
    ctx: &CmdContext<'_, B>,
    id: i64,
    patch: CollectionPatch,
) -> UpdateOutcome<Collection> {
    let mut collections = list_local(ctx.store);
    let now = ctx.clock.now();

    let outcome = match collections.iter().position(|col| col.id == id) {
        Some(idx) => {
            collections[idx].apply(patch, now);
            UpdateOutcome::Updated(collections[idx].clone())
        }
        None => {
            let collection = Collection::from_patch(id, patch, now);
            collections.push(collection.clone());
            UpdateOutcome::Created(collection)
        }
    };
    ctx.store.save(KEY, &collections);

    activity::record(
        ctx,
        ActivityAction::Updated,
        Subject::Collection(outcome.record()),
    );
    debug!(id, created = outcome.was_created(), "updated local collection");
    outcome
}

pub fn delete<B: StorageBackend>(store: &LocalStore<B>, id: i64) -> bool {
    let mut collections = list_local(store);
    let before = collections.len();
    collections.retain(|col| col.id != id);

    if collections.len() == before {
        debug!(id, "collection not found in local overlay");
        return false;
    }
    store.save(KEY, &collections);
    debug!(id, "deleted local collection");
    true
}

pub fn clear<B: StorageBackend>(store: &LocalStore<B>) {
    store.clear(KEY);
}

/// Case-insensitive match on name or description.
pub fn search(collections: Vec<Collection>, query: &str) -> Vec<Collection> {
    text_filter(collections, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{t0, TestEnv};
    use chrono::Duration;

    fn remote_collection(id: i64, name: &str, description: &str) -> Collection {
        Collection::from_patch(
            id,
            CollectionPatch::named(name).with_description(description),
            t0() - Duration::days(3),
        )
    }

    #[test]
    fn create_fills_defaults_and_emits_activity() {
        let env = TestEnv::new();
        let col = create(&env.ctx(), CollectionPatch::named("Research"));

        assert_eq!(col.name, "Research");
        assert_eq!(col.contributor_count, 1);
        assert_eq!(col.created_at, col.updated_at);
        assert_eq!(get_local(&env.store, col.id), Some(col.clone()));

        let items = activity::list_local(&env.store);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].action, ActivityAction::Created);
        assert_eq!(items[0].collection_id, Some(col.id));
        assert_eq!(items[0].document_id, None);
        assert_eq!(items[0].document_title, "Collection: Research");
        assert_eq!(items[0].author, "Dana Kim");
    }

    #[test]
    fn create_ignores_created_at_in_patch() {
        let env = TestEnv::new();
        let patch = CollectionPatch {
            created_at: Some(t0() - Duration::days(30)),
            ..CollectionPatch::named("Archive")
        };
        let col = create(&env.ctx(), patch);

        assert_eq!(col.created_at, t0());
        assert_eq!(col.created_at, col.updated_at);
    }

    #[test]
    fn update_existing_keeps_created_at() {
        let env = TestEnv::new();
        let col = create(&env.ctx(), CollectionPatch::named("Design"));
        env.advance_minutes(10);

        let outcome = update(
            &env.ctx(),
            col.id,
            CollectionPatch::default().with_description("Patterns"),
        );
        assert!(!outcome.was_created());
        let updated = outcome.record();
        assert_eq!(updated.name, "Design");
        assert_eq!(updated.description, "Patterns");
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, t0() + Duration::minutes(10));

        let items = activity::list_local(&env.store);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].action, ActivityAction::Updated);
    }

    #[test]
    fn update_unknown_id_upserts() {
        let env = TestEnv::new();
        let outcome = update(&env.ctx(), 4, CollectionPatch::named("People & Culture"));
        assert!(outcome.was_created());
        assert_eq!(outcome.record().id, 4);
        assert_eq!(list_local(&env.store).len(), 1);
        assert_eq!(activity::list_local(&env.store).len(), 1);
    }

    #[test]
    fn delete_only_touches_overlay() {
        let env = TestEnv::new();
        assert!(!delete(&env.store, 1));

        let col = create(&env.ctx(), CollectionPatch::named("Temp"));
        assert!(delete(&env.store, col.id));
        assert!(list_local(&env.store).is_empty());
        assert_eq!(activity::list_local(&env.store).len(), 1);
    }

    #[test]
    fn merge_prefers_local() {
        let env = TestEnv::new();
        let remote = vec![
            remote_collection(1, "Engineering", "API guides"),
            remote_collection(2, "Product", "Roadmaps"),
        ];
        update(&env.ctx(), 2, CollectionPatch::named("Product & Research"));

        let merged = merge(&env.store, remote);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Product & Research");
        assert_eq!(merged[1].name, "Engineering");
    }

    #[test]
    fn search_matches_name_or_description() {
        let cols = vec![
            remote_collection(1, "Engineering", "Technical documentation, API guides"),
            remote_collection(2, "Design", "Design systems"),
        ];
        let found = search(cols.clone(), "api");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        assert_eq!(search(cols.clone(), ""), cols);
    }
}
