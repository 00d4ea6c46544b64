#![forbid(unsafe_code)]

//! Insertion-point engine for drag-to-reorder lists.
//!
//! # Role in reorder
//! `reorder-insertion` decides where a dragged item would land. It splits
//! each item's footprint into directional insertion zones, maps the pointer
//! to a zone, decides whether hovering a collection means "reorder here",
//! "transfer here" or "nothing", and on drop rewrites the affected value
//! sequences.
//!
//! # How it fits in the system
//! Hosts describe what they rendered through [`host::LayoutProbe`], own the
//! value sequences behind [`host::ValueStore`], and draw the indicator
//! through [`host::Presenter`]. The engine never touches a rendering
//! surface directly.
//!
//! ```text
//! PointerEvent -> transition -> resolver -> indicator
//!                     |
//!                   drop -> commit -> ValueStore::set_values -> remap_finished
//! ```

pub mod commit;
pub mod config;
pub mod engine;
pub mod host;
pub mod indicator;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod transition;
pub mod zone;
pub mod zoning;

pub use commit::{CommitOutcome, NoMoveReason, SortEvent, TransferEvent};
pub use config::{
    AcceptContext, CollectionHooks, CollectionOptions, ConfigError, FeedbackClasses,
    IndicatorConfig, InsertionConfig,
};
pub use engine::InsertionEngine;
pub use host::{
    ClassTarget, DragLifecycle, InsertionHost, LayoutProbe, Presenter, RenderedNode, ValueStore,
};
pub use indicator::{IndicatorPlacement, InsertionIndicator};
pub use registry::{CollectionRecord, ItemRecord, Registry, RegistryError};
pub use resolver::Resolution;
pub use scheduler::{RezoneReason, RezoneScheduler, RezoneTicket};
pub use session::{DragSession, DraggedItem, HoverState, SessionError};
pub use transition::{NoopReason, RejectReason, Transition, TransitionEffect};
pub use zone::{Direction, ItemZones, Orientation, Zone};
pub use zoning::ZoningParams;
