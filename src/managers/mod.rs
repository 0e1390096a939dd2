// Recall state managers
// Managers own mutable application state.

pub mod bookmark_manager;
