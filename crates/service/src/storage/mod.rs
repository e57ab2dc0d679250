//! Storage abstractions for the service layer
//!
//! Contains the reusable file-backed document store that persists small
//! JSON values without pulling in a database.

pub mod json_doc_store;
