//! Terminal styles for the folio CLI.
//!
//! Render code refers to styles by what they mark (a title, a timestamp, a
//! document status), never by color. Colors are chosen once here so the look
//! can change without touching the renderers. `console` drops the escape codes
//! on its own when stdout is not a terminal.
use console::Style;
use folioapp::model::{ActivityAction, DocumentStatus};
use once_cell::sync::Lazy;

pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(240));
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());
pub static ID: Lazy<Style> = Lazy::new(|| Style::new().color256(178));
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());

static PUBLISHED: Lazy<Style> = Lazy::new(|| Style::new().green());
static DRAFT: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
static IN_REVIEW: Lazy<Style> = Lazy::new(|| Style::new().yellow());

static CREATED: Lazy<Style> = Lazy::new(|| Style::new().cyan());
static UPDATED: Lazy<Style> = Lazy::new(|| Style::new().blue());
static COMMENTED: Lazy<Style> = Lazy::new(|| Style::new().magenta());

pub fn status(status: DocumentStatus) -> &'static Style {
    match status {
        DocumentStatus::Published => &*PUBLISHED,
        DocumentStatus::Draft => &*DRAFT,
        DocumentStatus::InReview => &*IN_REVIEW,
    }
}

pub fn action(action: ActivityAction) -> &'static Style {
    match action {
        ActivityAction::Created => &*CREATED,
        ActivityAction::Updated => &*UPDATED,
        ActivityAction::Published => &*PUBLISHED,
        ActivityAction::Commented => &*COMMENTED,
    }
}
