//! # Remote Snapshot Sources
//!
//! The remote side of a merge is read-only and arrives whole: three lists, one
//! per kind. [`RemoteSource`] abstracts where they come from.
//!
//! - [`SeedSource`]: the built-in demo knowledge base, generated relative to a
//!   given "now" so relative timestamps stay meaningful.
//! - [`JsonDirSource`]: `documents.json`, `collections.json` and
//!   `activities.json` in a directory. A missing file is an empty list; a
//!   malformed one is an error.
//! - [`FlakySource`]: wraps another source and fails a configurable fraction of
//!   fetches with [`FolioError::Remote`], for exercising error paths.

use crate::error::{FolioError, Result};
use crate::model::{
    ActivityAction, ActivityItem, Collection, Document, DocumentStatus, RecordKind,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::path::PathBuf;
use tracing::{debug, warn};

pub trait RemoteSource {
    fn fetch_documents(&self) -> Result<Vec<Document>>;
    fn fetch_collections(&self) -> Result<Vec<Collection>>;
    fn fetch_activities(&self) -> Result<Vec<ActivityItem>>;
}

impl<S: RemoteSource + ?Sized> RemoteSource for Box<S> {
    fn fetch_documents(&self) -> Result<Vec<Document>> {
        (**self).fetch_documents()
    }

    fn fetch_collections(&self) -> Result<Vec<Collection>> {
        (**self).fetch_collections()
    }

    fn fetch_activities(&self) -> Result<Vec<ActivityItem>> {
        (**self).fetch_activities()
    }
}

// --- Seed data ---

struct SeedDoc {
    title: &'static str,
    body: &'static str,
    author: &'static str,
    initials: &'static str,
    status: DocumentStatus,
    hours_ago: i64,
    views: u64,
    collection: i64,
}

const SEED_DOCS: &[SeedDoc] = &[
    SeedDoc {
        title: "API Integration Guidelines",
        body: "<p>This document provides comprehensive guidelines for integrating with our REST API endpoints.</p><p>All endpoints require authentication via API keys or OAuth 2.0 tokens. Rate limiting is enforced at the account level.</p>",
        author: "Sarah Chen",
        initials: "SC",
        status: DocumentStatus::Published,
        hours_ago: 2,
        views: 287,
        collection: 1,
    },
    SeedDoc {
        title: "Q4 Product Roadmap Research",
        body: "<p>Our Q4 product roadmap is informed by extensive market analysis and competitive research conducted throughout Q3.</p><p>User interviews revealed consistent pain points around data synchronization and mobile accessibility.</p>",
        author: "Marcus Rivera",
        initials: "MR",
        status: DocumentStatus::Draft,
        hours_ago: 5,
        views: 142,
        collection: 2,
    },
    SeedDoc {
        title: "User Research Synthesis - Mobile App",
        body: "<p>This synthesis covers findings from 24 user interviews and 12 moderated usability testing sessions.</p><p>The primary insight is that users value speed over feature completeness in mobile contexts.</p>",
        author: "Alex Morgan",
        initials: "AM",
        status: DocumentStatus::InReview,
        hours_ago: 24,
        views: 98,
        collection: 2,
    },
    SeedDoc {
        title: "Security Best Practices 2025",
        body: "<p>Updated security protocols and compliance requirements for all engineering teams effective January 2025.</p><p>All production systems must implement multi-factor authentication for administrative access.</p>",
        author: "David Park",
        initials: "DP",
        status: DocumentStatus::Published,
        hours_ago: 48,
        views: 213,
        collection: 1,
    },
    SeedDoc {
        title: "Design System Documentation",
        body: "<p>The Atlas Design System provides a comprehensive library of reusable components, design tokens and interaction patterns.</p><p>Accessibility is built into every component following WCAG 2.1 Level AA standards.</p>",
        author: "Emma Wilson",
        initials: "EW",
        status: DocumentStatus::Published,
        hours_ago: 72,
        views: 342,
        collection: 3,
    },
    SeedDoc {
        title: "Customer Feedback Analysis - Dec 2024",
        body: "<p>December feedback analysis covers 1,247 support tickets, 89 feature requests and 34 bug reports.</p><p>Top requested features include offline mode, better mobile performance and more flexible permission controls.</p>",
        author: "Rachel Kim",
        initials: "RK",
        status: DocumentStatus::Draft,
        hours_ago: 96,
        views: 76,
        collection: 5,
    },
    SeedDoc {
        title: "Engineering Onboarding Guide",
        body: "<p>Welcome to the engineering team! This guide will help you get set up and productive in your first week.</p><p>Week 1 priorities include setting up your development environment and meeting your team members.</p>",
        author: "Sarah Chen",
        initials: "SC",
        status: DocumentStatus::Published,
        hours_ago: 120,
        views: 156,
        collection: 1,
    },
    SeedDoc {
        title: "Sprint Planning Process",
        body: "<p>Our sprint planning process follows agile best practices with some customizations for our team structure.</p><p>Each sprint is two weeks long, starting on Monday and ending on Friday of the second week.</p>",
        author: "Marcus Rivera",
        initials: "MR",
        status: DocumentStatus::Published,
        hours_ago: 144,
        views: 203,
        collection: 2,
    },
    SeedDoc {
        title: "Code Review Guidelines",
        body: "<p>Code reviews are essential for maintaining code quality and knowledge sharing across the team.</p><p>All pull requests require at least one approval before merging to main.</p>",
        author: "David Park",
        initials: "DP",
        status: DocumentStatus::Published,
        hours_ago: 168,
        views: 178,
        collection: 1,
    },
    SeedDoc {
        title: "Brand Guidelines 2025",
        body: "<p>Our brand has evolved to better reflect our mission and values.</p><p>The primary brand colors are now deeper and more vibrant to stand out in digital contexts.</p>",
        author: "Emma Wilson",
        initials: "EW",
        status: DocumentStatus::Draft,
        hours_ago: 192,
        views: 89,
        collection: 3,
    },
    SeedDoc {
        title: "Remote Work Policy",
        body: "<p>We support flexible work arrangements to help team members achieve work-life balance.</p><p>Team members can work remotely up to 3 days per week.</p>",
        author: "Rachel Kim",
        initials: "RK",
        status: DocumentStatus::InReview,
        hours_ago: 216,
        views: 267,
        collection: 4,
    },
    SeedDoc {
        title: "Incident Response Playbook",
        body: "<p>This playbook provides clear procedures for responding to production incidents of varying severity.</p><p>The incident commander is responsible for coordinating response efforts and communication.</p>",
        author: "David Park",
        initials: "DP",
        status: DocumentStatus::Published,
        hours_ago: 240,
        views: 312,
        collection: 1,
    },
];

struct SeedCollection {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    icon_bg: &'static str,
    document_count: u32,
    contributor_count: u32,
    created_days_ago: i64,
    updated_hours_ago: i64,
}

const SEED_COLLECTIONS: &[SeedCollection] = &[
    SeedCollection {
        name: "Engineering",
        description: "Technical documentation, API guides, and architecture decisions",
        icon: "📚",
        icon_bg: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        document_count: 42,
        contributor_count: 8,
        created_days_ago: 90,
        updated_hours_ago: 48,
    },
    SeedCollection {
        name: "Product",
        description: "Roadmaps, feature specs, and user research findings",
        icon: "⭐",
        icon_bg: "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
        document_count: 28,
        contributor_count: 5,
        created_days_ago: 80,
        updated_hours_ago: 5,
    },
    SeedCollection {
        name: "Design",
        description: "Design systems, UI patterns, and brand guidelines",
        icon: "🎨",
        icon_bg: "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
        document_count: 19,
        contributor_count: 4,
        created_days_ago: 70,
        updated_hours_ago: 72,
    },
    SeedCollection {
        name: "People & Culture",
        description: "Onboarding guides, team processes, and company policies",
        icon: "👥",
        icon_bg: "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
        document_count: 15,
        contributor_count: 3,
        created_days_ago: 60,
        updated_hours_ago: 240,
    },
    SeedCollection {
        name: "Sales & Marketing",
        description: "Sales playbooks, marketing campaigns, and customer stories",
        icon: "💼",
        icon_bg: "linear-gradient(135deg, #a8edea 0%, #fed6e3 100%)",
        document_count: 33,
        contributor_count: 6,
        created_days_ago: 50,
        updated_hours_ago: 24,
    },
    SeedCollection {
        name: "Legal & Compliance",
        description: "Contracts, policies, and regulatory documentation",
        icon: "⚖️",
        icon_bg: "linear-gradient(135deg, #ffecd2 0%, #fcb69f 100%)",
        document_count: 12,
        contributor_count: 2,
        created_days_ago: 40,
        updated_hours_ago: 168,
    },
];

/// The demo knowledge base: 12 documents, 6 collections and two activity
/// entries per document.
#[derive(Debug, Clone)]
pub struct SeedSource {
    now: DateTime<Utc>,
}

impl SeedSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn documents(&self) -> Vec<Document> {
        SEED_DOCS
            .iter()
            .zip(1..)
            .map(|(seed, id)| {
                let updated_at = self.now - Duration::hours(seed.hours_ago);
                Document {
                    id,
                    title: seed.title.to_string(),
                    snippet: crate::model::derive_snippet(seed.body),
                    body: seed.body.to_string(),
                    author: seed.author.to_string(),
                    author_initials: seed.initials.to_string(),
                    status: seed.status,
                    updated_at,
                    created_at: None,
                    views: seed.views,
                    collection_id: Some(seed.collection),
                }
            })
            .collect()
    }

    pub fn collections(&self) -> Vec<Collection> {
        SEED_COLLECTIONS
            .iter()
            .zip(1..)
            .map(|(seed, id)| Collection {
                id,
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                icon: seed.icon.to_string(),
                icon_bg: seed.icon_bg.to_string(),
                document_count: seed.document_count,
                contributor_count: seed.contributor_count,
                created_at: self.now - Duration::days(seed.created_days_ago),
                updated_at: self.now - Duration::hours(seed.updated_hours_ago),
            })
            .collect()
    }

    /// Per document: a `published` (or `created` for unpublished documents)
    /// entry at its update time, and an `updated` entry three hours earlier.
    pub fn activities(&self) -> Vec<ActivityItem> {
        let mut items: Vec<ActivityItem> = self
            .documents()
            .into_iter()
            .enumerate()
            .flat_map(|(idx, doc)| {
                let base = idx as i64 * 2;
                let first = if doc.status == DocumentStatus::Published {
                    ActivityAction::Published
                } else {
                    ActivityAction::Created
                };
                [
                    seed_activity(base + 1, first, &doc, doc.updated_at),
                    seed_activity(
                        base + 2,
                        ActivityAction::Updated,
                        &doc,
                        doc.updated_at - Duration::hours(3),
                    ),
                ]
            })
            .collect();
        crate::merge::sort_recent_first(&mut items);
        items
    }
}

fn seed_activity(
    id: i64,
    action: ActivityAction,
    doc: &Document,
    timestamp: DateTime<Utc>,
) -> ActivityItem {
    ActivityItem {
        id,
        action,
        author: doc.author.clone(),
        author_initials: doc.author_initials.clone(),
        document_title: doc.title.clone(),
        document_id: Some(doc.id),
        collection_id: doc.collection_id,
        timestamp,
    }
}

impl RemoteSource for SeedSource {
    fn fetch_documents(&self) -> Result<Vec<Document>> {
        Ok(self.documents())
    }

    fn fetch_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.collections())
    }

    fn fetch_activities(&self) -> Result<Vec<ActivityItem>> {
        Ok(self.activities())
    }
}

// --- JSON directory ---

#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_list<R: DeserializeOwned>(&self, kind: RecordKind) -> Result<Vec<R>> {
        let path = self.dir.join(kind.store_key().file_name());
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "snapshot file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| {
            FolioError::Remote(format!("malformed snapshot {}: {}", path.display(), e))
        })
    }
}

impl RemoteSource for JsonDirSource {
    fn fetch_documents(&self) -> Result<Vec<Document>> {
        self.read_list(RecordKind::Document)
    }

    fn fetch_collections(&self) -> Result<Vec<Collection>> {
        self.read_list(RecordKind::Collection)
    }

    fn fetch_activities(&self) -> Result<Vec<ActivityItem>> {
        self.read_list(RecordKind::Activity)
    }
}

// --- Failure injection ---

/// Fails each fetch with probability `failure_rate` (clamped to `0.0..=1.0`).
pub struct FlakySource<S> {
    inner: S,
    failure_rate: f64,
    rng: RefCell<StdRng>,
}

impl<S: RemoteSource> FlakySource<S> {
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_rng(inner, failure_rate, StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn seeded(inner: S, failure_rate: f64, seed: u64) -> Self {
        Self::with_rng(inner, failure_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(inner: S, failure_rate: f64, rng: StdRng) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            inner,
            failure_rate,
            rng: RefCell::new(rng),
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    fn roll(&self, kind: RecordKind) -> Result<()> {
        if self.rng.borrow_mut().gen_bool(self.failure_rate) {
            warn!(%kind, rate = self.failure_rate, "injected remote failure");
            return Err(FolioError::Remote(format!(
                "simulated failure fetching {}",
                kind.store_key()
            )));
        }
        Ok(())
    }
}

impl<S: RemoteSource> RemoteSource for FlakySource<S> {
    fn fetch_documents(&self) -> Result<Vec<Document>> {
        self.roll(RecordKind::Document)?;
        self.inner.fetch_documents()
    }

    fn fetch_collections(&self) -> Result<Vec<Collection>> {
        self.roll(RecordKind::Collection)?;
        self.inner.fetch_collections()
    }

    fn fetch_activities(&self) -> Result<Vec<ActivityItem>> {
        self.roll(RecordKind::Activity)?;
        self.inner.fetch_activities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::t0;
    use std::collections::HashSet;

    #[test]
    fn seed_has_expected_shape() {
        let seed = SeedSource::new(t0());
        let docs = seed.documents();
        let cols = seed.collections();
        let items = seed.activities();

        assert_eq!(docs.len(), 12);
        assert_eq!(cols.len(), 6);
        assert_eq!(items.len(), 24);

        let ids: HashSet<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 24);
        assert!(items.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        assert_eq!(docs[0].updated_at, t0() - Duration::hours(2));
        assert!(docs.iter().all(|d| d.snippet.len() <= 63 && !d.snippet.contains('<')));
        let col_ids: HashSet<i64> = cols.iter().map(|c| c.id).collect();
        assert!(docs.iter().all(|d| col_ids.contains(&d.collection_id.unwrap())));
    }

    #[test]
    fn seed_first_activity_reflects_status() {
        let items = SeedSource::new(t0()).activities();
        let newest = &items[0];
        assert_eq!(newest.document_id, Some(1));
        assert_eq!(newest.action, ActivityAction::Published);
        let draft = items
            .iter()
            .find(|i| i.document_id == Some(2) && i.timestamp == t0() - Duration::hours(5))
            .unwrap();
        assert_eq!(draft.action, ActivityAction::Created);
    }

    #[test]
    fn flaky_source_extremes() {
        let always = FlakySource::seeded(SeedSource::new(t0()), 1.0, 7);
        assert!(matches!(always.fetch_documents(), Err(FolioError::Remote(_))));

        let never = FlakySource::seeded(SeedSource::new(t0()), 0.0, 7);
        assert_eq!(never.fetch_collections().unwrap().len(), 6);

        assert_eq!(FlakySource::seeded(SeedSource::new(t0()), 3.5, 1).failure_rate(), 1.0);
        assert_eq!(FlakySource::seeded(SeedSource::new(t0()), f64::NAN, 1).failure_rate(), 0.0);
    }

    #[test]
    fn boxed_source_delegates() {
        let boxed: Box<dyn RemoteSource> = Box::new(SeedSource::new(t0()));
        assert_eq!(boxed.fetch_activities().unwrap().len(), 24);
    }
}
