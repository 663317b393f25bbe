//! Test support utilities - only compiled in test builds.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::{
    block::MemoryBlock,
    bridge::Bridge,
    builder::BridgeBuilder,
    error::NoSuchTarget,
    notify::{Delivered, NoRegistry, Notification, ProcessId, ProcessRegistry},
    variants,
};

pub type MpuBridge<'r> = Bridge<MemoryBlock<180>, &'r RecordingRegistry, 180>;
pub type ApdsBridge = Bridge<MemoryBlock<48>, NoRegistry, 48>;
pub type SegmentBridge<'b> = Bridge<&'b mut MemoryBlock<12>, NoRegistry, 8>;

type Sent = heapless::Vec<(ProcessId, Notification), 64>;

/// Registry over a fixed set of live pids that records every delivery.
pub struct RecordingRegistry {
    live: heapless::Vec<ProcessId, 8>,
    sent: Mutex<RefCell<Sent>>,
}

impl RecordingRegistry {
    /// No live processes.
    pub fn new() -> Self {
        Self::with_live(&[])
    }

    pub fn with_live(pids: &[u32]) -> Self {
        Self {
            live: pids.iter().filter_map(|&pid| ProcessId::new(pid)).collect(),
            sent: Mutex::new(RefCell::new(Sent::new())),
        }
    }

    pub fn sent_count(&self) -> usize {
        critical_section::with(|cs| self.sent.borrow_ref(cs).len())
    }

    /// Deliveries so far, oldest first.
    pub fn sent(&self) -> impl Iterator<Item = (ProcessId, Notification)> {
        critical_section::with(|cs| self.sent.borrow_ref(cs).clone()).into_iter()
    }
}

impl ProcessRegistry for RecordingRegistry {
    type Process = ProcessId;

    fn resolve(&self, pid: ProcessId) -> Option<ProcessId> {
        self.live.contains(&pid).then_some(pid)
    }

    fn send(
        &self,
        process: &ProcessId,
        notification: Notification,
    ) -> Result<Delivered, NoSuchTarget> {
        critical_section::with(|cs| {
            self.sent
                .borrow_ref_mut(cs)
                .push((*process, notification))
                .map(|_| Delivered)
                .map_err(|_| NoSuchTarget)
        })
    }
}

/// Motion sensor over a simulated block.
pub fn mpu_bridge(block: MemoryBlock<180>, registry: &RecordingRegistry) -> MpuBridge<'_> {
    BridgeBuilder::new()
        .window_size::<180>()
        .layout(&variants::MPU9250)
        .registry(registry)
        .attach(block)
}

/// Read-only light sensor over a simulated block.
pub fn apds_bridge(block: MemoryBlock<48>) -> ApdsBridge {
    BridgeBuilder::new()
        .window_size::<48>()
        .layout(&variants::APDS9301)
        .no_registry()
        .attach(block)
}

/// Display over a borrowed block, so tests can inspect the registers after detach.
pub fn segment_bridge(block: &mut MemoryBlock<12>) -> SegmentBridge<'_> {
    BridgeBuilder::new()
        .window_size::<8>()
        .layout(&variants::SEVEN_SEGMENT)
        .no_registry()
        .attach(block)
}
