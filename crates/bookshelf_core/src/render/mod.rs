//! View rendering for the presentation surface.
//!
//! # Responsibility
//! - Define the renderer capability used by presentation routes.
//! - Keep markup generation out of routing and services.
//!
//! # Invariants
//! - Renderers never emit storage keys.
//! - Caller-supplied text is escaped before it reaches markup.

mod html;

pub use html::{escape_html, HtmlRenderer};

use crate::model::book::Book;

/// Renders catalog data into documents.
pub trait ViewRenderer: Send + Sync {
    /// Landing page linking to the listing views.
    fn render_index(&self) -> String;
    /// Table of full book records.
    fn render_table(&self, books: &[Book]) -> String;
    /// Titled list of plain values, e.g. distinct authors.
    fn render_list(&self, heading: &str, items: &[String]) -> String;
    /// Search bar fragment.
    fn render_search(&self) -> String;
}
