//! Blog pages
//!
//! Front page, single-post permalinks, and the new-post form.

pub mod front;
pub mod newpost;
pub mod permalink;
