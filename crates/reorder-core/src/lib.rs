#![forbid(unsafe_code)]

//! Core: geometry, identifiers, and pointer input for drag-to-reorder lists.
//!
//! # Role in reorder
//! `reorder-core` is the input layer. It owns the pixel geometry types,
//! the non-zero identifiers hosts assign to rendered collections and items,
//! and the normalized pointer events the insertion engine consumes.
//!
//! # How it fits in the system
//! `reorder-insertion` consumes these types and drives zone resolution and
//! commits. Hosts (DOM bindings, native toolkits, the test harness) depend on
//! this crate only to describe what they render and where the pointer is.

pub mod event;
pub mod geometry;
pub mod id;

pub use event::{HitTarget, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect};
pub use id::{CollectionId, IdError, ItemId};
