//! # Rendering Module
//!
//! Turns library results into terminal text. Every function here returns a
//! `String`; printing is left to the command handlers, so rendering can be
//! tested without a terminal.
//!
//! ## List Layout
//!
//! Document rows are fixed-width columns:
//! - `id` (right-aligned, [`COL_ID`] wide)
//! - `status` ([`COL_STATUS`] wide)
//! - `title` (fill, truncated by display width)
//! - `author` initials ([`COL_AUTHOR`] wide)
//! - `time` (right-aligned relative timestamp, [`COL_TIME`] wide)
//!
//! Widths are measured with `unicode-width`, so titles with emoji or CJK
//! characters still line up.

use super::styles;
use chrono::{DateTime, Utc};
use folioapp::commands::query::{Page, SearchResults};
use folioapp::model::{ActivityItem, Collection, Document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const COL_ID: usize = 14;
pub const COL_STATUS: usize = 10;
pub const COL_AUTHOR: usize = 4;
pub const COL_TIME: usize = 16;

const ELLIPSIS: &str = "…";

/// Cuts `text` to at most `width` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Relative time such as "2 hours ago". Future timestamps read as "now".
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

fn document_row(doc: &Document, now: DateTime<Utc>) -> String {
    let fixed = COL_ID + COL_STATUS + COL_AUTHOR + COL_TIME + 4;
    let title_width = LINE_WIDTH.saturating_sub(fixed);
    let title = pad_to_width(&truncate_to_width(&doc.title, title_width), title_width);
    let status = pad_to_width(&doc.status.to_string(), COL_STATUS);
    let time = format!("{:>width$}", format_time_ago(doc.updated_at, now), width = COL_TIME);

    format!(
        "{} {} {} {} {}",
        styles::ID.apply_to(format!("{:>width$}", doc.id, width = COL_ID)),
        styles::status(doc.status).apply_to(status),
        title,
        styles::MUTED.apply_to(pad_to_width(&doc.author_initials, COL_AUTHOR)),
        styles::TIME.apply_to(time),
    )
}

pub fn document_page(page: &Page<Document>, now: DateTime<Utc>) -> String {
    if page.items.is_empty() {
        return format!("{}\n", styles::MUTED.apply_to("No documents found."));
    }
    let mut out = String::new();
    for doc in &page.items {
        out.push_str(&document_row(doc, now));
        out.push('\n');
    }
    let p = &page.pagination;
    let mut footer = format!(
        "Page {} of {} · {} document{}",
        p.page,
        p.total_pages,
        p.total,
        if p.total == 1 { "" } else { "s" }
    );
    if p.has_next {
        footer.push_str(&format!(" · next: --page {}", p.page + 1));
    }
    out.push_str(&format!("{}\n", styles::FAINT.apply_to(footer)));
    out
}

pub fn document_detail(doc: &Document, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", styles::TITLE.apply_to(&doc.title)));
    out.push_str(&format!(
        "{} · {} ({}) · {} · {} views\n",
        styles::status(doc.status).apply_to(doc.status),
        doc.author,
        doc.author_initials,
        styles::TIME.apply_to(format!("updated {}", format_time_ago(doc.updated_at, now))),
        doc.views
    ));
    if let Some(created) = doc.created_at {
        out.push_str(&format!(
            "{}\n",
            styles::MUTED.apply_to(format!("created {}", created.to_rfc3339()))
        ));
    }
    if let Some(collection) = doc.collection_id {
        out.push_str(&format!(
            "{}\n",
            styles::MUTED.apply_to(format!("collection {}", collection))
        ));
    }
    out.push('\n');
    out.push_str(&doc.snippet);
    out.push_str("\n\n");
    out.push_str(&doc.body);
    out.push('\n');
    out
}

fn collection_row(col: &Collection, now: DateTime<Utc>) -> String {
    let label = format!("{} {}", col.icon, col.name);
    let counts = format!(
        "{} docs · {} contributors",
        col.document_count, col.contributor_count
    );
    format!(
        "{} {} {} {}",
        styles::ID.apply_to(format!("{:>width$}", col.id, width = COL_ID)),
        pad_to_width(&truncate_to_width(&label, 32), 32),
        styles::MUTED.apply_to(pad_to_width(&counts, 30)),
        styles::TIME.apply_to(format_time_ago(col.updated_at, now)),
    )
}

pub fn collection_list(cols: &[Collection], now: DateTime<Utc>) -> String {
    if cols.is_empty() {
        return format!("{}\n", styles::MUTED.apply_to("No collections found."));
    }
    let mut out = String::new();
    for col in cols {
        out.push_str(&collection_row(col, now));
        out.push('\n');
    }
    out
}

pub fn collection_detail(col: &Collection, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{} {}\n",
        col.icon,
        styles::TITLE.apply_to(&col.name)
    );
    if !col.description.is_empty() {
        out.push_str(&format!("{}\n", col.description));
    }
    out.push_str(&format!(
        "{}\n",
        styles::MUTED.apply_to(format!(
            "{} documents · {} contributors · updated {}",
            col.document_count,
            col.contributor_count,
            format_time_ago(col.updated_at, now)
        ))
    ));
    out
}

pub fn activity_feed(items: &[ActivityItem], now: DateTime<Utc>) -> String {
    if items.is_empty() {
        return format!("{}\n", styles::MUTED.apply_to("No activity."));
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{} {} {} {}  {}\n",
            styles::MUTED.apply_to(pad_to_width(&item.author_initials, COL_AUTHOR)),
            pad_to_width(&item.author, 16),
            styles::action(item.action).apply_to(pad_to_width(&item.action.to_string(), 10)),
            truncate_to_width(&item.document_title, 48),
            styles::TIME.apply_to(format_time_ago(item.timestamp, now)),
        ));
    }
    out
}

pub fn search_results(results: &SearchResults, now: DateTime<Utc>) -> String {
    if results.total_results == 0 {
        return format!("{}\n", styles::MUTED.apply_to("No results."));
    }
    let mut out = String::new();
    if !results.documents.is_empty() {
        out.push_str(&format!(
            "{}\n",
            styles::TITLE.apply_to(format!("Documents ({})", results.documents.len()))
        ));
        for doc in &results.documents {
            out.push_str(&document_row(doc, now));
            out.push('\n');
        }
    }
    if !results.collections.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}\n",
            styles::TITLE.apply_to(format!("Collections ({})", results.collections.len()))
        ));
        out.push_str(&collection_list(&results.collections, now));
    }
    out
}

pub fn success(message: &str) -> String {
    format!("{}\n", styles::SUCCESS.apply_to(message))
}

pub fn warning(message: &str) -> String {
    format!("{}\n", styles::WARNING.apply_to(message))
}
