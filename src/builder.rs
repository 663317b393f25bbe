use core::marker::PhantomData;

use crate::{
    block::RegisterBlock,
    bridge::Bridge,
    layout::DeviceLayout,
    notify::{NoRegistry, ProcessRegistry},
};

// Builder states
pub struct NeedWindowSize;
pub struct NeedLayout;
pub struct NeedRegistry;
pub struct Ready;

/// Typestate builder for a [`Bridge`].
///
/// ```rust
/// use register_bridge::prelude::*;
///
/// let bridge = BridgeBuilder::new()
///     .window_size::<180>()
///     .layout(&variants::MPU9250)
///     .no_registry()
///     .attach(MemoryBlock::<180>::new());
/// assert_eq!(bridge.layout().name, "mpu9250");
/// ```
pub struct BridgeBuilder<const WS: usize, R, State> {
    layout: Option<&'static DeviceLayout>,
    registry: Option<R>,
    _phantom: PhantomData<State>,
}

impl Default for BridgeBuilder<0, (), NeedWindowSize> {
    fn default() -> Self {
        Self::new()
    }
}

// Start the builder
impl BridgeBuilder<0, (), NeedWindowSize> {
    pub fn new() -> Self {
        BridgeBuilder {
            layout: None,
            registry: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the user-visible window size, which sizes every per-device buffer.
    pub fn window_size<const WS: usize>(self) -> BridgeBuilder<WS, (), NeedLayout> {
        BridgeBuilder {
            layout: None,
            registry: None,
            _phantom: PhantomData,
        }
    }
}

// Set layout
impl<const WS: usize> BridgeBuilder<WS, (), NeedLayout> {
    /// # Panics
    /// Panics if the layout's window size is not `WS`.
    pub fn layout(self, layout: &'static DeviceLayout) -> BridgeBuilder<WS, (), NeedRegistry> {
        assert_eq!(
            layout.window_size, WS,
            "{} needs a {}-byte window, builder has {}",
            layout.name, layout.window_size, WS
        );

        BridgeBuilder {
            layout: Some(layout),
            registry: None,
            _phantom: PhantomData,
        }
    }
}

// Set registry
impl<const WS: usize> BridgeBuilder<WS, (), NeedRegistry> {
    pub fn registry<R: ProcessRegistry>(self, registry: R) -> BridgeBuilder<WS, R, Ready> {
        BridgeBuilder {
            layout: self.layout,
            registry: Some(registry),
            _phantom: PhantomData,
        }
    }

    /// Triggers resolve no process and deliver nothing.
    pub fn no_registry(self) -> BridgeBuilder<WS, NoRegistry, Ready> {
        self.registry(NoRegistry)
    }
}

// Attach to the register block
impl<const WS: usize, R: ProcessRegistry> BridgeBuilder<WS, R, Ready> {
    /// Takes over `block` and returns the attached bridge.
    ///
    /// # Panics
    /// Panics if the layout does not fit the block.
    pub fn attach<B: RegisterBlock>(self, block: B) -> Bridge<B, R, WS> {
        match (self.layout, self.registry) {
            (Some(layout), Some(registry)) => Bridge::attach(layout, block, registry),
            // Both are set on the way to `Ready`.
            _ => unreachable!("builder reached Ready without layout and registry"),
        }
    }
}
