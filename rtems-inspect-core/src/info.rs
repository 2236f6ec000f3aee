//! Object information table client.
//!
//! The kernel keeps a per-(api, class) `Objects_Information` record whose
//! `local_table` maps 1-based indexes to object control blocks. Resolving an
//! information record costs several target reads, so resolved addresses are
//! cached here; the cache is only valid within one top-level inspection and
//! is dropped by `invalidate()` at every depth-zero boundary.

use crate::error::InspectError;
use crate::id::{ObjectId, ObjectKind};
use crate::memory::TargetMemory;
use crate::symbols::SymbolManager;
use anyhow::{anyhow, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// In-memory layout of the information table structures.
///
/// Offsets describe the 32-bit classic build:
/// `Objects_Information` carries the_api (0x00), the_class (0x04),
/// minimum_id (0x08), maximum_id (0x0C), maximum (0x10), local_table (0x14).
/// Layouts vary across kernel versions, so this is configuration, not code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoTableLayout {
    /// Symbol naming the api-indexed table of class tables.
    pub table_symbol: String,
    /// Target pointer size in bytes.
    pub pointer_size: u64,
    /// Offset of the `maximum` slot count within `Objects_Information`.
    pub maximum_offset: u64,
    /// Offset of the `local_table` pointer within `Objects_Information`.
    pub local_table_offset: u64,
    /// Offset of the `id` field within `Objects_Control`.
    pub id_offset: u64,
}

impl Default for InfoTableLayout {
    fn default() -> Self {
        Self {
            table_symbol: "_Objects_Information_table".to_string(),
            pointer_size: 4,
            maximum_offset: 0x10,
            local_table_offset: 0x14,
            id_offset: 0x08,
        }
    }
}

/// A resolved object record: an address in target memory plus the runtime
/// type name of the control structure living there. Produced per dispatch
/// and never cached by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Address of the control structure in target memory.
    pub address: u64,
    /// Runtime type name, e.g. `Semaphore_Control`.
    pub type_name: String,
}

/// Client for the kernel's object information tables.
pub struct ObjectInfoTable {
    layout: InfoTableLayout,
    // Resolved Objects_Information addresses, keyed by (api, class).
    cache: HashMap<(u32, u32), u64>,
    generation: u64,
}

impl ObjectInfoTable {
    pub fn new(layout: InfoTableLayout) -> Self {
        Self { layout, cache: HashMap::new(), generation: 0 }
    }

    /// Resolve the `Objects_Information` address for an (api, class) pair,
    /// consulting the cache first. `Ok(None)` means the kernel has no table
    /// entry for the pair (api or class not configured).
    fn information(
        &mut self,
        api: u32,
        class: u32,
        mem: &mut dyn TargetMemory,
        symbols: &SymbolManager,
    ) -> Result<Option<u64>> {
        if let Some(&addr) = self.cache.get(&(api, class)) {
            return Ok(Some(addr));
        }

        let base = symbols
            .lookup_symbol(&self.layout.table_symbol)
            .ok_or_else(|| anyhow!("symbol {} not found in target image", self.layout.table_symbol))?;

        let ptr = self.layout.pointer_size;
        let api_table = mem
            .read_word_32(base + u64::from(api) * ptr)
            .context("Failed to read information table api entry")?;
        if api_table == 0 {
            return Ok(None);
        }

        let info = mem
            .read_word_32(u64::from(api_table) + u64::from(class) * ptr)
            .context("Failed to read information table class entry")?;
        if info == 0 {
            return Ok(None);
        }

        self.cache.insert((api, class), u64::from(info));
        Ok(Some(u64::from(info)))
    }

    /// Address of the object slot for `index` within an information record,
    /// or `None` when the index is outside the live 1-based range or the
    /// slot is empty.
    fn slot(
        &self,
        info: u64,
        index: u32,
        mem: &mut dyn TargetMemory,
    ) -> Result<Option<u64>> {
        let maximum = mem
            .read_word_32(info + self.layout.maximum_offset)
            .context("Failed to read information table maximum")?;
        if index == 0 || index > maximum {
            return Ok(None);
        }

        let local_table = mem
            .read_word_32(info + self.layout.local_table_offset)
            .context("Failed to read local_table pointer")?;
        if local_table == 0 {
            return Ok(None);
        }

        let slot = mem
            .read_word_32(u64::from(local_table) + u64::from(index) * self.layout.pointer_size)
            .context("Failed to read local_table slot")?;
        Ok(if slot == 0 { None } else { Some(u64::from(slot)) })
    }

    /// Resolve an identifier to its object record.
    ///
    /// Fails with `InvalidIdentifier` when the id is syntactically decodable
    /// but names no live object: unconfigured (api, class), zero index,
    /// index past the table, empty slot, or a slot whose stored id differs.
    pub fn object(
        &mut self,
        id: &ObjectId,
        mem: &mut dyn TargetMemory,
        symbols: &SymbolManager,
    ) -> Result<ObjectRecord, InspectError> {
        let invalid = || InspectError::InvalidIdentifier(id.value());

        let info = self
            .information(id.api(), id.class(), mem, symbols)?
            .ok_or_else(invalid)?;
        let address = self.slot(info, id.index(), mem)?.ok_or_else(invalid)?;

        let stored = mem
            .read_word_32(address + self.layout.id_offset)
            .context("Failed to read object id field")?;
        if stored != id.value() {
            return Err(invalid());
        }

        let type_name = match ObjectKind::classify(id.api(), id.class()) {
            Some(kind) => kind.type_name().to_string(),
            None => format!("{}/{}", id.api_name(), id.class_name()),
        };
        Ok(ObjectRecord { address, type_name })
    }

    /// Resolve a (kind, index) pair to its object record.
    ///
    /// Fails with `IndexOutOfRange` when `index` does not name a live slot.
    pub fn object_by_index(
        &mut self,
        kind: ObjectKind,
        index: u32,
        mem: &mut dyn TargetMemory,
        symbols: &SymbolManager,
    ) -> Result<ObjectRecord, InspectError> {
        let out_of_range =
            || InspectError::IndexOutOfRange { class: kind.class_name(), index };

        let info = self
            .information(kind.api_value(), kind.class_value(), mem, symbols)?
            .ok_or_else(out_of_range)?;
        let address = self.slot(info, index, mem)?.ok_or_else(out_of_range)?;

        Ok(ObjectRecord { address, type_name: kind.type_name().to_string() })
    }

    /// Drop all cached table addresses. Safe to call when nothing is cached.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.generation = self.generation.wrapping_add(1);
        log::debug!("information table cache invalidated (generation {})", self.generation);
    }

    /// Number of invalidations so far. The cache epoch: reads within one
    /// generation observe a single target snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether any table address is currently cached.
    pub fn is_cached(&self) -> bool {
        !self.cache.is_empty()
    }
}
