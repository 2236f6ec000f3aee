//! Mock target support.
//!
//! `MockTarget` is a byte-map memory used by tests and by the CLI's
//! `--mock` mode; `sample_kernel` lays out a small but structurally
//! faithful classic object subsystem inside it.

use crate::memory::TargetMemory;
use crate::symbols::SymbolManager;
use anyhow::Result;
use std::collections::HashMap;

/// In-process target memory backed by a byte map. Unwritten addresses
/// read as zero, which the resolution paths treat as null pointers.
#[derive(Default)]
pub struct MockTarget {
    data: HashMap<u64, u8>,
}

impl MockTarget {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    /// Store a little-endian 32-bit word.
    pub fn set_word_32(&mut self, addr: u64, val: u32) {
        for (i, byte) in val.to_le_bytes().iter().enumerate() {
            self.data.insert(addr + i as u64, *byte);
        }
    }

    /// Store raw bytes.
    pub fn set_bytes(&mut self, addr: u64, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.data.insert(addr + i as u64, byte);
        }
    }
}

impl TargetMemory for MockTarget {
    fn read_word_32(&mut self, address: u64) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_8(address, &mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    fn read_8(&mut self, address: u64, data: &mut [u8]) -> Result<()> {
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = *self.data.get(&(address + i as u64)).unwrap_or(&0);
        }
        Ok(())
    }
}

/// Pack a classic 4-character object name the way `rtems_build_name` does.
pub fn build_name(name: &str) -> u32 {
    let mut bytes = [b' '; 4];
    for (i, b) in name.bytes().take(4).enumerate() {
        bytes[i] = b;
    }
    u32::from_be_bytes(bytes)
}

// Identifiers of the objects laid out by `sample_kernel`, 32-bit classic
// encoding (class << 27 | api << 24 | node << 16 | index).
pub const TASK1_ID: u32 = 0x0A01_0001;
pub const TASK2_ID: u32 = 0x0A01_0002;
pub const TIMER1_ID: u32 = 0x1201_0001;
pub const SEM1_ID: u32 = 0x1A01_0001;
pub const SEM2_ID: u32 = 0x1A01_0002;
pub const MQ1_ID: u32 = 0x2201_0001;
pub const PART1_ID: u32 = 0x2A01_0001;
pub const REGION1_ID: u32 = 0x3201_0001;
pub const PORT1_ID: u32 = 0x3A01_0001;
pub const BARRIER1_ID: u32 = 0x5201_0001;

/// Number of live semaphore slots in the sample kernel.
pub const SEM_COUNT: u32 = 2;

const TABLE_BASE: u64 = 0x0010_0000;
const CLASSIC_TABLE: u64 = 0x0010_0100;

/// Build a sample classic kernel image: information tables for tasks,
/// timers, semaphores, message queues, partitions, regions, ports, and
/// barriers, each with one or two live objects. Ports exist but have no
/// display adapter, which exercises the unknown-kind path.
pub fn sample_kernel() -> (MockTarget, SymbolManager) {
    let mut mem = MockTarget::new();
    let mut symbols = SymbolManager::new();
    symbols.define("_Objects_Information_table", TABLE_BASE);

    // api table: only classic (api 2) is configured
    mem.set_word_32(TABLE_BASE + 2 * 4, CLASSIC_TABLE as u32);

    fn info_record(
        mem: &mut MockTarget,
        class: u32,
        info: u64,
        maximum: u32,
        local: u64,
        slots: &[u64],
    ) {
        mem.set_word_32(CLASSIC_TABLE + u64::from(class) * 4, info as u32);
        mem.set_word_32(info, 2); // the_api
        mem.set_word_32(info + 0x04, class);
        mem.set_word_32(info + 0x10, maximum);
        mem.set_word_32(info + 0x14, local as u32);
        for (i, &slot) in slots.iter().enumerate() {
            mem.set_word_32(local + (i as u64 + 1) * 4, slot as u32);
        }
    }

    fn header(mem: &mut MockTarget, addr: u64, id: u32, name: &str) {
        mem.set_word_32(addr + 0x08, id);
        mem.set_word_32(addr + 0x0C, build_name(name));
    }

    info_record(&mut mem, 1, 0x0010_0200, 2, 0x0010_0240, &[0x0020_1000, 0x0020_1100]);
    info_record(&mut mem, 2, 0x0010_0280, 1, 0x0010_02C0, &[0x0020_4000]);
    info_record(&mut mem, 3, 0x0010_0300, SEM_COUNT, 0x0010_0340, &[0x0020_0000, 0x0020_0100]);
    info_record(&mut mem, 4, 0x0010_0400, 1, 0x0010_0440, &[0x0020_2000]);
    info_record(&mut mem, 5, 0x0010_0480, 1, 0x0010_04C0, &[0x0020_5000]);
    info_record(&mut mem, 6, 0x0010_0500, 1, 0x0010_0540, &[0x0020_6000]);
    info_record(&mut mem, 7, 0x0010_0580, 1, 0x0010_05C0, &[0x0020_3000]);
    info_record(&mut mem, 10, 0x0010_0600, 1, 0x0010_0640, &[0x0020_7000]);

    // Tasks: ready UI1 at priority 5, IDLE blocked on a semaphore
    header(&mut mem, 0x0020_1000, TASK1_ID, "UI1 ");
    mem.set_word_32(0x0020_1000 + 0x10, 0x0000); // current_state: READY
    mem.set_word_32(0x0020_1000 + 0x14, 5); // current_priority
    mem.set_word_32(0x0020_1000 + 0x18, 5); // real_priority
    mem.set_word_32(0x0020_1000 + 0x1C, 0); // resource_count
    mem.set_word_32(0x0020_1000 + 0x20, 1234); // cpu_time_used

    header(&mut mem, 0x0020_1100, TASK2_ID, "IDLE");
    mem.set_word_32(0x0020_1100 + 0x10, 0x0200); // WAITING_FOR_SEMAPHORE
    mem.set_word_32(0x0020_1100 + 0x14, 255);
    mem.set_word_32(0x0020_1100 + 0x18, 255);

    // Timer: interval 100 ticks, 40 remaining
    header(&mut mem, 0x0020_4000, TIMER1_ID, "TMR1");
    mem.set_word_32(0x0020_4000 + 0x10, 2); // watchdog state: active
    mem.set_word_32(0x0020_4000 + 0x14, 100); // initial
    mem.set_word_32(0x0020_4000 + 0x18, 40); // remaining

    // Semaphores: SEM1 priority binary held once, SEM2 counting
    header(&mut mem, 0x0020_0000, SEM1_ID, "SEM1");
    mem.set_word_32(0x0020_0000 + 0x10, 0x0014); // PRIORITY | BINARY_SEMAPHORE
    mem.set_word_32(0x0020_0000 + 0x14, 0); // count: held
    mem.set_word_32(0x0020_0000 + 0x18, TASK1_ID); // holder id
    mem.set_word_32(0x0020_0000 + 0x1C, 1); // nest count

    header(&mut mem, 0x0020_0100, SEM2_ID, "SEM2");
    mem.set_word_32(0x0020_0100 + 0x10, 0x0000); // counting, FIFO
    mem.set_word_32(0x0020_0100 + 0x14, 3);

    // Message queue: 2 of 16 messages pending, 64-byte maximum
    header(&mut mem, 0x0020_2000, MQ1_ID, "MQ1 ");
    mem.set_word_32(0x0020_2000 + 0x10, 0x0000);
    mem.set_word_32(0x0020_2000 + 0x14, 16); // maximum_pending_messages
    mem.set_word_32(0x0020_2000 + 0x18, 2); // number_of_pending_messages
    mem.set_word_32(0x0020_2000 + 0x1C, 64); // maximum_message_size

    // Partition: 8 buffers of 128 bytes, 3 in use
    header(&mut mem, 0x0020_5000, PART1_ID, "PT1 ");
    mem.set_word_32(0x0020_5000 + 0x10, 0x3000_0000); // starting_address
    mem.set_word_32(0x0020_5000 + 0x14, 1024); // length
    mem.set_word_32(0x0020_5000 + 0x18, 128); // buffer_size
    mem.set_word_32(0x0020_5000 + 0x1C, 0); // attribute_set
    mem.set_word_32(0x0020_5000 + 0x20, 3); // number_of_used_blocks

    // Region
    header(&mut mem, 0x0020_6000, REGION1_ID, "RN1 ");
    mem.set_word_32(0x0020_6000 + 0x10, 0x3100_0000); // starting_address
    mem.set_word_32(0x0020_6000 + 0x14, 4096); // length
    mem.set_word_32(0x0020_6000 + 0x18, 16); // page_size
    mem.set_word_32(0x0020_6000 + 0x1C, 2048); // maximum_segment_size
    mem.set_word_32(0x0020_6000 + 0x20, 0); // attribute_set
    mem.set_word_32(0x0020_6000 + 0x24, 1); // number_of_used_blocks

    // Dual-ported memory area: live object, no adapter
    header(&mut mem, 0x0020_3000, PORT1_ID, "DP1 ");

    // Barrier: manual release, 2 waiters
    header(&mut mem, 0x0020_7000, BARRIER1_ID, "BA1 ");
    mem.set_word_32(0x0020_7000 + 0x10, 0x0000); // attribute_set
    mem.set_word_32(0x0020_7000 + 0x14, 0); // maximum_count (manual release)
    mem.set_word_32(0x0020_7000 + 0x18, 2); // number_of_waiting_threads

    (mem, symbols)
}
