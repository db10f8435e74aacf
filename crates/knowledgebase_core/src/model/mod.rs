//! Domain model for the knowledge base.
//!
//! # Responsibility
//! - Define the canonical records shared by services, stores and use cases.
//! - Keep range invariants (score, mark) next to the data they protect.
//!
//! # Invariants
//! - Identifier `0` always means "not persisted yet".
//! - Items reference categories by value; they never own category lifecycle.

pub mod category;
pub mod knowledge_item;
