//! Selection-aware markdown formatting.
//!
//! Every function is pure: it takes the current buffer and selection and
//! returns an [`Edit`](folio_primitives::Edit) holding the new buffer and the
//! selection the host should restore. Nothing here touches history.

mod line;
mod wrap;

pub use line::{MAX_HEADING, blockquote, heading, ordered_list, unordered_list};
pub use wrap::{Marker, color_span, inline_code, toggle, toggle_bold, toggle_italic, toggle_strikethrough};

#[cfg(test)]
mod tests;
