//! Event Handling Module
//!
//! - **`keys`**: keyboard input processing for every screen and overlay

pub mod keys;
