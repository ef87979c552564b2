//! Markdown preview rendering for the folio editor.
//!
//! [`Renderer::render`] turns a markdown document into sanitised HTML with
//! highlighted code and MathML formulas. It never fails: a formula that cannot
//! be typeset renders as an inline error box and is reported as a
//! [`MathDiagnostic`].

pub mod config;
pub mod highlight;
pub mod math;
pub mod pipeline;
pub mod sanitize;

pub use config::RenderConfig;
pub use math::{MathDiagnostic, MathError};
pub use pipeline::{Preview, Renderer, render};
pub use sanitize::is_safe_color;
