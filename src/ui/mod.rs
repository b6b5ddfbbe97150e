//! Terminal presentation
//!
//! Everything here only reads from [`crate::app::App`]; state changes live
//! in the handlers and the notes view-model.

pub mod components;
pub mod markdown_view;
pub mod notes_page;
pub mod profile_page;
pub mod theme;
