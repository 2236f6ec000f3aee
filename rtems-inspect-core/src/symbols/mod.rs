//! Symbol lookup for the target image.

use anyhow::Result;
use object::{Object, ObjectSymbol};
use std::collections::HashMap;
use std::path::Path;

/// Manager for resolving symbol names to target addresses.
///
/// Addresses come from the ELF symbol table of the loaded image; manual
/// definitions take precedence and let mock targets run without an ELF.
pub struct SymbolManager {
    elf_data: Option<Vec<u8>>,
    overrides: HashMap<String, u64>,
}

impl SymbolManager {
    pub fn new() -> Self {
        Self { elf_data: None, overrides: HashMap::new() }
    }

    /// Load symbols from an ELF file.
    pub fn load_elf(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        // Validate up front so lookups can assume a parseable image.
        object::File::parse(&*data)
            .map_err(|e| anyhow::anyhow!("Failed to parse ELF {}: {}", path.display(), e))?;
        self.elf_data = Some(data);
        log::info!("Loaded symbols from {}", path.display());
        Ok(())
    }

    /// Define a symbol directly, shadowing any ELF symbol of the same name.
    pub fn define(&mut self, name: &str, address: u64) {
        self.overrides.insert(name.to_string(), address);
    }

    pub fn has_symbols(&self) -> bool {
        self.elf_data.is_some() || !self.overrides.is_empty()
    }

    /// Lookup a symbol address by name.
    pub fn lookup_symbol(&self, name: &str) -> Option<u64> {
        if let Some(&addr) = self.overrides.get(name) {
            return Some(addr);
        }
        let data = self.elf_data.as_ref()?;
        let obj = object::File::parse(&**data).ok()?;

        for symbol in obj.symbols() {
            if let Ok(sym_name) = symbol.name() {
                if sym_name == name {
                    return Some(symbol.address());
                }
            }
        }
        None
    }
}

impl Default for SymbolManager {
    fn default() -> Self {
        Self::new()
    }
}
