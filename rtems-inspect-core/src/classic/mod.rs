//! Classic API display adapters.
//!
//! One adapter per object kind, each built from a single resolved record
//! and stateless beyond it. `adapter_for` is the closed kind-to-adapter
//! table: adding a kind extends the `ObjectKind` match and the compiler
//! checks exhaustiveness.

pub mod barrier;
pub mod mqueue;
pub mod partition;
pub mod region;
pub mod semaphore;
pub mod task;
pub mod timer;

pub use barrier::BarrierAdapter;
pub use mqueue::MessageQueueAdapter;
pub use partition::PartitionAdapter;
pub use region::RegionAdapter;
pub use semaphore::SemaphoreAdapter;
pub use task::TaskAdapter;
pub use timer::TimerAdapter;

use crate::dispatch::{Scope, TypedValue};
use crate::formatters::supercore::{CONTROL_ID_OFFSET, CONTROL_NAME_OFFSET};
use crate::id::ObjectKind;
use crate::info::ObjectRecord;
use anyhow::Result;

/// A per-kind report renderer over one object record.
pub trait Displayable {
    /// Render the record. `verbose` adds secondary fields.
    fn show(&self, scope: &mut Scope<'_>, verbose: bool) -> Result<String>;
}

/// Construct the adapter for a classified kind.
pub fn adapter_for(kind: ObjectKind, record: ObjectRecord) -> Box<dyn Displayable> {
    match kind {
        ObjectKind::Task => Box::new(TaskAdapter::new(record)),
        ObjectKind::Timer => Box::new(TimerAdapter::new(record)),
        ObjectKind::Semaphore => Box::new(SemaphoreAdapter::new(record)),
        ObjectKind::MessageQueue => Box::new(MessageQueueAdapter::new(record)),
        ObjectKind::Partition => Box::new(PartitionAdapter::new(record)),
        ObjectKind::Region => Box::new(RegionAdapter::new(record)),
        ObjectKind::Barrier => Box::new(BarrierAdapter::new(record)),
    }
}

/// Render the `name: id:` line shared by every adapter, dispatching the
/// embedded header fields and falling back to raw hex on a registry miss.
pub(crate) fn header_line(scope: &mut Scope<'_>, record: &ObjectRecord) -> Result<String> {
    let name = dispatch_or_hex(
        scope,
        &TypedValue::new("Objects_Name", record.address + CONTROL_NAME_OFFSET),
    )?;
    let id = dispatch_or_hex(
        scope,
        &TypedValue::new("Objects_Id", record.address + CONTROL_ID_OFFSET),
    )?;
    Ok(format!("name:{name} id:{id}"))
}

/// Dispatch a value, falling back to the raw word as hex when no formatter
/// has an opinion.
pub(crate) fn dispatch_or_hex(scope: &mut Scope<'_>, value: &TypedValue) -> Result<String> {
    if let Some(text) = scope.dispatch(value)? {
        return Ok(text);
    }
    let raw = scope.mem.read_word_32(value.address)?;
    Ok(format!("0x{raw:08X}"))
}
