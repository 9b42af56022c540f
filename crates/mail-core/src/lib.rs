//! Shared types for the mail summary workspace: the event and person model,
//! name normalization, errors, settings and time helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod time_utils;
