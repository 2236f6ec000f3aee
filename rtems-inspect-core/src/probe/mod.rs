//! Debug probe access.
//!
//! Enumerates probes and adapts a probe-rs session to the inspector's
//! read-only [`TargetMemory`] view. Reads go through core 0 of the session;
//! the target is left running or halted as found.

use crate::memory::TargetMemory;
use anyhow::{Context as _, Result};
use probe_rs::probe::list::Lister;
use probe_rs::probe::{DebugProbeInfo, Probe};
use probe_rs::{MemoryInterface, Permissions, Session};

/// Information about an available debug probe.
#[derive(Debug, Clone)]
pub struct ProbeInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
}

impl From<&DebugProbeInfo> for ProbeInfo {
    fn from(info: &DebugProbeInfo) -> Self {
        ProbeInfo {
            vendor_id: info.vendor_id,
            product_id: info.product_id,
            serial_number: info.serial_number.clone(),
        }
    }
}

impl ProbeInfo {
    pub fn name(&self) -> String {
        match &self.serial_number {
            Some(serial) => {
                format!("{:04X}:{:04X} ({serial})", self.vendor_id, self.product_id)
            }
            None => format!("{:04X}:{:04X}", self.vendor_id, self.product_id),
        }
    }
}

/// Probe enumeration.
pub struct ProbeManager {
    lister: Lister,
}

impl ProbeManager {
    pub fn new() -> Self {
        Self { lister: Lister::new() }
    }

    pub fn list_probes(&self) -> Vec<ProbeInfo> {
        self.lister.list_all().iter().map(ProbeInfo::from).collect()
    }

    /// Open a probe by index from the enumeration order.
    pub fn open_probe(&self, index: usize) -> Result<Probe> {
        let probes = self.lister.list_all();
        let probe_info = probes.get(index).context("Probe index out of range")?;
        probe_info.open().context("Failed to open probe")
    }
}

impl Default for ProbeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Target memory over a live probe session.
pub struct ProbeTarget {
    session: Session,
}

impl ProbeTarget {
    /// Open the probe at `probe_index` and attach to `chip` ("auto" lets
    /// probe-rs detect the target).
    pub fn attach(chip: &str, probe_index: usize) -> Result<Self> {
        let probe = ProbeManager::new().open_probe(probe_index)?;
        let session = probe
            .attach(chip, Permissions::default())
            .with_context(|| format!("Failed to attach to target {chip}"))?;
        log::info!("attached to {}", session.target().name);
        Ok(Self { session })
    }

    pub fn from_session(session: Session) -> Self {
        Self { session }
    }
}

impl TargetMemory for ProbeTarget {
    fn read_word_32(&mut self, address: u64) -> Result<u32> {
        let mut core = self.session.core(0).context("Failed to attach core")?;
        core.read_word_32(address).context("Failed to read 32-bit word")
    }

    fn read_8(&mut self, address: u64, data: &mut [u8]) -> Result<()> {
        let mut core = self.session.core(0).context("Failed to attach core")?;
        core.read_8(address, data).context("Failed to read memory block")
    }
}
