//! Shared helpers.

pub mod html;
