//! A `no_std`, no-alloc bridge between memory-mapped sensor registers and a
//! user-space consumer.
//!
//! Each attached device exposes a fixed-size register window through an
//! endpoint. Reads return the live registers, or a reshaped event snapshot;
//! writes are sparse ASCII updates decoded into register values, a read mode
//! and the id of the process to notify. An interrupt handler fires the
//! device's trigger line, which signals that process without blocking.
//!
//! # Features
//!
//! - **Zero heap allocation** - every buffer is sized by the window const generic
//! - **Bounds-checked windows** - offsets past the end fail, overruns are clamped
//! - **Sparse config writes** - NUL and the layout's unset byte keep stored bytes
//! - **Exclusive or shared sessions** - per device variant
//! - **Injected process registry** - POSIX queued signals with the `std` feature
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐         ┌──────────────────────────┐
//! │  Blocking context    │         │  Interrupt context       │
//! │                      │         │                          │
//! │  open()   ──────────▶│ session │                          │
//! │  write()  ──────────▶│  owner ─┼──▶ TriggerLine::fire()   │
//! │  read()              │  (atomic│     resolve(pid)         │
//! │   │                  │   pid)  │     send(notification)   │
//! │   ▼                  │         │                          │
//! │  RegisterWindow      │         │  never touches registers │
//! └──────────────────────┘         └──────────────────────────┘
//! ```
//!
//! - **Endpoint writes** merge into the config image and commit decoded fields
//! - **Endpoint reads** refetch the registers and assemble the frame
//! - **Trigger lines** only read the owner atomic and call the registry
//!
//! # Example
//!
//! ```rust
//! use register_bridge::prelude::*;
//!
//! let mut block = MemoryBlock::<180>::new();
//! block.load(0, &[0x11; 36]);
//!
//! let bridge = BridgeBuilder::new()
//!     .window_size::<180>()
//!     .layout(&variants::MPU9250)
//!     .no_registry()
//!     .attach(block);
//!
//! let mut endpoint = bridge.open().unwrap();
//! assert_eq!(bridge.open().unwrap_err(), BridgeError::Busy);
//!
//! // Config bytes, streaming mode, consumer pid
//! endpoint.write(0, b"ACCEL2G;Q000000001234").unwrap();
//! assert_eq!(bridge.owner().map(|pid| pid.get()), Some(1234));
//!
//! let mut sample = [0u8; 36];
//! endpoint.read(0, &mut sample).unwrap();
//! assert_eq!(sample, [0x11; 36]);
//!
//! // No registry: the trigger resolves nothing
//! assert_eq!(
//!     bridge.trigger_line().fire(),
//!     TriggerOutcome::NoSuchProcess(bridge.owner().unwrap())
//! );
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub mod bridge;
pub mod builder;
pub mod codec;
pub mod error;
pub mod frame;
pub mod handle;
pub mod helpers;
pub mod image;
pub mod layout;
pub mod notify;
pub(crate) mod session;
pub mod variants;
pub mod window;

#[cfg(test)]
mod test_support;

pub use block::{MemoryBlock, RegisterBlock};
pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use codec::{FieldValue, decode_field};
pub use error::{BridgeError, FieldError, NoSuchTarget};
pub use frame::{ReadMode, assemble_frame};
pub use handle::{Endpoint, TriggerLine, TriggerOutcome};
pub use image::RegisterImage;
pub use layout::{
    ConfigField, DeviceLayout, Encoding, EventLayout, Readback, SessionPolicy, Sink, Span,
};
#[cfg(all(feature = "std", target_os = "linux"))]
pub use notify::signal::SignalRegistry;
pub use notify::{Delivered, NoRegistry, Notification, ProcessId, ProcessRegistry, SignalId};
pub use window::{Access, RegisterWindow};

pub mod prelude {
    #[cfg(all(feature = "std", target_os = "linux"))]
    pub use super::SignalRegistry;
    pub use super::{
        Access, Bridge, BridgeBuilder, BridgeError, DeviceLayout, Endpoint, MemoryBlock,
        NoRegistry, Notification, ProcessId, ProcessRegistry, ReadMode, RegisterBlock,
        RegisterImage, TriggerLine, TriggerOutcome, variants,
    };
}
