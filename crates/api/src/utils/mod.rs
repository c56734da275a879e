//! Cross-cutting helpers for the application layer

pub mod health;
pub mod logging;
