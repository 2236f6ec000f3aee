//! RTEMS Inspect Core - object inspection engine.
//!
//! This crate decodes RTEMS object identifiers, resolves them to live object
//! records in an attached target's memory, and routes records through a
//! registry of type-name formatters and per-kind display adapters.

pub mod classic;
pub mod dispatch;
pub mod error;
pub mod formatters;
pub mod id;
pub mod info;
pub mod inspector;
pub mod memory;
pub mod mock;
#[cfg(feature = "hardware")]
pub mod probe;
pub mod registry;
pub mod session;
pub mod symbols;

// Re-export commonly used types
pub use classic::{adapter_for, Displayable};
pub use dispatch::{DispatchContext, Scope, TypedValue};
pub use error::InspectError;
pub use id::{api_name, class_name, BitField, IdLayout, ObjectId, ObjectKind};
pub use info::{InfoTableLayout, ObjectInfoTable, ObjectRecord};
pub use inspector::{Inspector, TargetLayout};
pub use memory::TargetMemory;
#[cfg(feature = "hardware")]
pub use probe::{ProbeInfo, ProbeManager, ProbeTarget};
pub use registry::{FormatterRegistry, ValueFormatter};
pub use session::{InspectCommand, InspectEvent, SessionHandle};
pub use symbols::SymbolManager;
