//! UI preferences: a single JSON object stored next to the overlays.
//!
//! Every field is optional. Saving takes a patch and merges its set fields onto
//! whatever is stored, one level deep: a patch carrying `documentFilters` with
//! only `sort` set keeps the stored `status`.

use crate::commands::query::{SortOption, StatusFilter};
use crate::store::backend::StorageBackend;
use crate::store::local::LocalStore;
use crate::store::StoreKey;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

const KEY: StoreKey = StoreKey::Preferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "grid" => Ok(ViewMode::Grid),
            _ => Err(format!("unknown view mode '{}' (expected list or grid)", s)),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("unknown theme '{}' (expected light or dark)", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_view_mode: Option<ViewMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_document_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_collection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_filters: Option<DocumentFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_preferences: Option<ViewPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

fn overlay<T>(target: &mut Option<T>, patch: Option<T>) {
    if patch.is_some() {
        *target = patch;
    }
}

impl DocumentFilters {
    fn merge_from(&mut self, patch: DocumentFilters) {
        overlay(&mut self.status, patch.status);
        overlay(&mut self.sort, patch.sort);
    }
}

impl ViewPreferences {
    fn merge_from(&mut self, patch: ViewPreferences) {
        overlay(&mut self.documents_view_mode, patch.documents_view_mode);
        overlay(&mut self.theme, patch.theme);
    }
}

impl UserProfile {
    fn merge_from(&mut self, patch: UserProfile) {
        overlay(&mut self.initials, patch.initials);
    }
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        *self == Preferences::default()
    }

    /// Copies every set field of `patch` onto `self`. Nested groups merge
    /// field by field.
    pub fn merge_from(&mut self, patch: Preferences) {
        overlay(&mut self.selected_document_id, patch.selected_document_id);
        overlay(&mut self.selected_collection_id, patch.selected_collection_id);
        overlay(&mut self.sidebar_collapsed, patch.sidebar_collapsed);

        if let Some(filters) = patch.document_filters {
            self.document_filters
                .get_or_insert_with(Default::default)
                .merge_from(filters);
        }
        if let Some(view) = patch.view_preferences {
            self.view_preferences
                .get_or_insert_with(Default::default)
                .merge_from(view);
        }
        if let Some(profile) = patch.user_profile {
            self.user_profile
                .get_or_insert_with(Default::default)
                .merge_from(profile);
        }
    }
}

pub fn load<B: StorageBackend>(store: &LocalStore<B>) -> Preferences {
    store.load_value(KEY)
}

/// Merges `patch` onto the stored preferences and returns the result.
pub fn save<B: StorageBackend>(store: &LocalStore<B>, patch: Preferences) -> Preferences {
    let mut prefs = load(store);
    prefs.merge_from(patch);
    store.save_value(KEY, &prefs);
    debug!("saved preferences");
    prefs
}

pub fn clear<B: StorageBackend>(store: &LocalStore<B>) {
    store.clear(KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentStatus;
    use crate::store::mem_backend::MemBackend;

    fn make_store() -> LocalStore<MemBackend> {
        LocalStore::with_backend(MemBackend::new())
    }

    #[test]
    fn missing_preferences_load_as_default() {
        let store = make_store();
        assert!(load(&store).is_empty());
    }

    #[test]
    fn save_merges_nested_groups() {
        let store = make_store();
        save(
            &store,
            Preferences {
                selected_document_id: Some(3),
                document_filters: Some(DocumentFilters {
                    status: Some(StatusFilter::Only(DocumentStatus::Draft)),
                    sort: None,
                }),
                ..Default::default()
            },
        );
        let prefs = save(
            &store,
            Preferences {
                sidebar_collapsed: Some(true),
                document_filters: Some(DocumentFilters {
                    status: None,
                    sort: Some(SortOption::Title),
                }),
                ..Default::default()
            },
        );

        assert_eq!(prefs.selected_document_id, Some(3));
        assert_eq!(prefs.sidebar_collapsed, Some(true));
        let filters = prefs.document_filters.clone().unwrap();
        assert_eq!(filters.status, Some(StatusFilter::Only(DocumentStatus::Draft)));
        assert_eq!(filters.sort, Some(SortOption::Title));
        assert_eq!(load(&store), prefs);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let store = make_store();
        save(
            &store,
            Preferences {
                view_preferences: Some(ViewPreferences {
                    documents_view_mode: Some(ViewMode::Grid),
                    theme: Some(Theme::Dark),
                }),
                user_profile: Some(UserProfile {
                    initials: Some("DK".into()),
                }),
                ..Default::default()
            },
        );
        let raw = store.backend().raw(StoreKey::Preferences).unwrap();
        assert!(raw.contains("\"documentsViewMode\": \"grid\""));
        assert!(raw.contains("\"theme\": \"dark\""));
        assert!(raw.contains("\"userProfile\""));
        assert!(!raw.contains("selectedDocumentId"));
    }

    #[test]
    fn corrupt_blob_loads_default_and_clear_removes() {
        let store = make_store();
        store.backend().put_raw(StoreKey::Preferences, "{not json");
        assert!(load(&store).is_empty());

        save(&store, Preferences { sidebar_collapsed: Some(false), ..Default::default() });
        clear(&store);
        assert!(load(&store).is_empty());
        assert_eq!(store.backend().raw(StoreKey::Preferences), None);
    }
}
