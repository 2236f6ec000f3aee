//! The inspector: single owner of the engine state.
//!
//! Bundles the id layout, formatter registry, information table, dispatch
//! context, symbols, and the target into one explicit context, and
//! implements the operator command surface with its batch semantics:
//! arguments are processed left to right and the first hard error aborts
//! the remainder, except that an unknown object kind is reported and only
//! skips its own argument. The information-table cache is invalidated on
//! every command exit path, including error paths.

use crate::classic::adapter_for;
use crate::dispatch::{DispatchContext, Scope, TypedValue};
use crate::error::InspectError;
use crate::formatters::default_registry;
use crate::id::{IdLayout, ObjectId, ObjectKind};
use crate::info::{InfoTableLayout, ObjectInfoTable, ObjectRecord};
use crate::memory::TargetMemory;
use crate::registry::FormatterRegistry;
use crate::symbols::SymbolManager;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Target ABI description: the id bit layout plus the information-table
/// layout. Loadable from JSON with either section omitted, in which case it
/// defaults to the 32-bit classic build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetLayout {
    pub id: IdLayout,
    pub info_table: InfoTableLayout,
}

pub struct Inspector<M: TargetMemory> {
    layout: IdLayout,
    registry: FormatterRegistry,
    info: ObjectInfoTable,
    symbols: SymbolManager,
    ctx: DispatchContext,
    mem: M,
}

impl<M: TargetMemory> Inspector<M> {
    /// Inspector with the default id layout, table layout, and formatter
    /// registry.
    pub fn new(mem: M, symbols: SymbolManager) -> Self {
        Self::with_config(mem, symbols, IdLayout::classic_32(), InfoTableLayout::default())
    }

    /// Inspector for a target described by a loaded [`TargetLayout`].
    pub fn with_layout(mem: M, symbols: SymbolManager, layout: TargetLayout) -> Self {
        Self::with_config(mem, symbols, layout.id, layout.info_table)
    }

    /// Inspector for a target with non-default ABI layouts.
    pub fn with_config(
        mem: M,
        symbols: SymbolManager,
        layout: IdLayout,
        table_layout: InfoTableLayout,
    ) -> Self {
        Self {
            layout,
            registry: default_registry(layout),
            info: ObjectInfoTable::new(table_layout),
            symbols,
            ctx: DispatchContext::new(),
            mem,
        }
    }

    /// The formatter registry, for hosts registering additional entries.
    pub fn registry_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.registry
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolManager {
        &mut self.symbols
    }

    /// Current dispatch depth; zero between inspections.
    pub fn depth(&self) -> u32 {
        self.ctx.depth()
    }

    /// Cache generation of the information table.
    pub fn generation(&self) -> u64 {
        self.info.generation()
    }

    fn scope(&mut self) -> Scope<'_> {
        Scope {
            registry: &self.registry,
            mem: &mut self.mem,
            info: &mut self.info,
            symbols: &self.symbols,
            ctx: &mut self.ctx,
        }
    }

    /// Decode a raw word with this target's id layout.
    pub fn decode(&self, raw: u32) -> ObjectId {
        ObjectId::decode(raw, self.layout)
    }

    /// Resolve an identifier to its object record.
    pub fn resolve_id(&mut self, id: &ObjectId) -> Result<ObjectRecord, InspectError> {
        self.info.object(id, &mut self.mem, &self.symbols)
    }

    /// Resolve a (kind, index) pair to its object record.
    pub fn resolve_index(
        &mut self,
        kind: ObjectKind,
        index: u32,
    ) -> Result<ObjectRecord, InspectError> {
        self.info.object_by_index(kind, index, &mut self.mem, &self.symbols)
    }

    /// Whether an identifier names a live object.
    pub fn valid(&mut self, id: &ObjectId) -> bool {
        self.resolve_id(id).is_ok()
    }

    /// Top-level value dispatch. `Ok(None)` means no formatter matched and
    /// the host should fall back to its default rendering.
    pub fn dispatch_value(&mut self, value: &TypedValue) -> Result<Option<String>> {
        self.scope().dispatch(value)
    }

    /// Render one resolved record through its kind's display adapter, inside
    /// a dispatch bracket so nested reads share one cache snapshot.
    pub fn render_object(
        &mut self,
        kind: ObjectKind,
        record: ObjectRecord,
        verbose: bool,
    ) -> Result<String> {
        let adapter = adapter_for(kind, record);
        self.scope().nested(|scope| adapter.show(scope, verbose))
    }

    /// `rtems object <id>...`
    pub fn object_command(
        &mut self,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        let result = self.object_args(args, verbose, out);
        self.info.invalidate();
        result
    }

    fn object_args(
        &mut self,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        for arg in args {
            let raw = parse_number(arg)?;
            let id = self.decode(raw);
            let record = self.info.object(&id, &mut self.mem, &self.symbols)?;

            out.push(format!(
                "API:{} Class:{} Node:{} Index:{} Id:{:08X}",
                id.api_name(),
                id.class_name(),
                id.node(),
                id.index(),
                id.value()
            ));

            match ObjectKind::classify(id.api(), id.class()) {
                Some(kind) => out.push(self.render_object(kind, record, verbose)?),
                None => {
                    // Reported; the batch moves on to the next argument.
                    let err = InspectError::UnknownObjectKind {
                        api: id.api_name(),
                        class: id.class_name(),
                    };
                    log::warn!("{err}");
                    out.push(err.to_string());
                }
            }
        }
        Ok(())
    }

    /// `rtems semaphore <index>...`
    pub fn semaphore_command(
        &mut self,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        self.kind_command(ObjectKind::Semaphore, args, verbose, out)
    }

    /// `rtems task <index>...`
    pub fn task_command(
        &mut self,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        self.kind_command(ObjectKind::Task, args, verbose, out)
    }

    /// `rtems mqueue <index>...`
    pub fn mqueue_command(
        &mut self,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        self.kind_command(ObjectKind::MessageQueue, args, verbose, out)
    }

    fn kind_command(
        &mut self,
        kind: ObjectKind,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        let result = self.kind_args(kind, args, verbose, out);
        self.info.invalidate();
        result
    }

    fn kind_args(
        &mut self,
        kind: ObjectKind,
        args: &[String],
        verbose: bool,
        out: &mut Vec<String>,
    ) -> Result<(), InspectError> {
        for arg in args {
            let index = parse_number(arg)?;
            let record =
                self.info.object_by_index(kind, index, &mut self.mem, &self.symbols)?;
            out.push(self.render_object(kind, record, verbose)?);
        }
        Ok(())
    }
}

/// Parse a command argument as a decimal or `0x`-prefixed hex number.
fn parse_number(arg: &str) -> Result<u32, InspectError> {
    let parsed = if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        arg.parse::<u32>()
    };
    parsed.map_err(|_| InspectError::MalformedArgument(arg.to_string()))
}
