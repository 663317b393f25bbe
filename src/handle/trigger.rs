use crate::{
    layout::DeviceLayout,
    notify::{ProcessId, ProcessRegistry},
    session::Session,
};

/// What a single trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The registry accepted the notification.
    Delivered(ProcessId),
    /// No consumer is registered.
    NoConsumer,
    /// The registered consumer could not be resolved or signalled.
    NoSuchProcess(ProcessId),
    /// The device sends no notifications.
    Unsupported,
}

/// Interrupt-context side of a bridge.
///
/// Firing never blocks, never takes the device state and never fails: every
/// problem is reported as an outcome and logged. Copies are cheap and can be
/// handed to an interrupt handler or a thread standing in for one.
pub struct TriggerLine<'a, R: ProcessRegistry> {
    layout: &'static DeviceLayout,
    session: &'a Session,
    registry: &'a R,
}

impl<R: ProcessRegistry> Clone for TriggerLine<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ProcessRegistry> Copy for TriggerLine<'_, R> {}

impl<R: ProcessRegistry> core::fmt::Debug for TriggerLine<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TriggerLine")
            .field("device", &self.layout.name)
            .finish_non_exhaustive()
    }
}

impl<'a, R: ProcessRegistry> TriggerLine<'a, R> {
    pub(crate) fn new(layout: &'static DeviceLayout, session: &'a Session, registry: &'a R) -> Self {
        Self {
            layout,
            session,
            registry,
        }
    }

    /// Notifies the registered consumer once.
    pub fn fire(&self) -> TriggerOutcome {
        let Some(notification) = self.layout.notification else {
            return TriggerOutcome::Unsupported;
        };

        let Some(pid) = self.session.owner() else {
            tracing::debug!(device = self.layout.name, "trigger with no consumer");
            return TriggerOutcome::NoConsumer;
        };

        let Some(process) = self.registry.resolve(pid) else {
            tracing::warn!(device = self.layout.name, %pid, "consumer not found");
            return TriggerOutcome::NoSuchProcess(pid);
        };

        match self.registry.send(&process, notification) {
            Ok(_) => {
                tracing::trace!(device = self.layout.name, %pid, "consumer notified");
                TriggerOutcome::Delivered(pid)
            }
            Err(err) => {
                tracing::warn!(device = self.layout.name, %pid, %err, "notification dropped");
                TriggerOutcome::NoSuchProcess(pid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        block::MemoryBlock,
        notify::Notification,
        test_support::{RecordingRegistry, apds_bridge, mpu_bridge},
    };

    #[test]
    fn delivers_to_registered_consumer() {
        let registry = RecordingRegistry::with_live(&[1234]);
        let bridge = mpu_bridge(MemoryBlock::new(), &registry);

        let mut endpoint = bridge.open().unwrap();
        endpoint.write(10, b"00000001234").unwrap();
        drop(endpoint);

        let pid = ProcessId::new(1234).unwrap();
        assert_eq!(bridge.trigger_line().fire(), TriggerOutcome::Delivered(pid));
        assert_eq!(registry.sent_count(), 1);
        assert_eq!(registry.sent().next(), Some((pid, Notification::MOTION_EVENT)));
    }

    #[test]
    fn no_consumer_sends_nothing() {
        let registry = RecordingRegistry::with_live(&[1234]);
        let bridge = mpu_bridge(MemoryBlock::new(), &registry);

        assert_eq!(bridge.trigger_line().fire(), TriggerOutcome::NoConsumer);
        assert_eq!(registry.sent_count(), 0);
    }

    #[test]
    fn vanished_consumer_is_reported() {
        let registry = RecordingRegistry::new();
        let bridge = mpu_bridge(MemoryBlock::new(), &registry);

        bridge.open().unwrap().write(10, b"00000000099").unwrap();

        let pid = ProcessId::new(99).unwrap();
        assert_eq!(bridge.trigger_line().fire(), TriggerOutcome::NoSuchProcess(pid));
        assert_eq!(registry.sent_count(), 0);
    }

    #[test]
    fn fires_while_endpoint_is_open() {
        let registry = RecordingRegistry::with_live(&[7]);
        let bridge = mpu_bridge(MemoryBlock::new(), &registry);
        let line = bridge.trigger_line();

        let mut endpoint = bridge.open().unwrap();
        endpoint.write(10, b"00000000007").unwrap();
        assert!(matches!(line.fire(), TriggerOutcome::Delivered(_)));
        assert!(matches!(line.fire(), TriggerOutcome::Delivered(_)));
        assert_eq!(registry.sent_count(), 2);
    }

    #[test]
    fn device_without_notification_is_unsupported() {
        let bridge = apds_bridge(MemoryBlock::new());
        assert_eq!(bridge.trigger_line().fire(), TriggerOutcome::Unsupported);
    }
}
