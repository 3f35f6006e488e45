//! Domain model for contacts and groups.
//!
//! # Responsibility
//! - Define the canonical contact/group records shared by store, services and
//!   the section index.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every record is identified by a store-assigned integer id.
//! - A contact's group fields are either both set or both absent.

pub mod contact;
pub mod group;
