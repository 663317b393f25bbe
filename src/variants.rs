//! Descriptors of the supported device variants.
//!
//! Each variant maps a fixed register block. Offsets are in bytes; every
//! register is 32 bits wide.

use crate::{
    layout::{
        ConfigField, DeviceLayout, Encoding, EventLayout, Readback, SessionPolicy, Sink, Span,
    },
    notify::Notification,
    window::Access,
};

/// Register offsets of the motion sensor block.
pub mod mpu9250 {
    /// Streaming accelerometer, gyro and magnetometer sample, 9 registers.
    pub const SAMPLE: usize = 0;
    /// 64-bit sample timestamp.
    pub const TIMESTAMP: usize = 36;
    /// Raw ASCII configuration, as last written.
    pub const CONFIG: usize = 120;
    /// Snapshot latched by the motion interrupt: sample, then timestamp.
    pub const EVENT: usize = 132;
}

/// Register offsets of the seven-segment display block.
pub mod seven_segment {
    /// Digit value, one nibble per digit, first digit highest.
    pub const VALUE: usize = 0;
    pub const PWM: usize = 4;
    /// Per-digit enable bits, first digit highest.
    pub const ENABLE: usize = 8;
}

const MPU9250_FIELDS: [ConfigField; 4] = [
    ConfigField::new("config", 0, 9, Encoding::Raw, Sink::Register(mpu9250::CONFIG)),
    ConfigField::new("mode", 9, 1, Encoding::Raw, Sink::ReadMode),
    ConfigField::new("pid", 10, 11, Encoding::AsciiDecimal, Sink::Owner),
    ConfigField::new("reserved", 21, 1, Encoding::Raw, Sink::Stored),
];

/// Motion sensor with interrupt-driven event capture.
pub const MPU9250: DeviceLayout = DeviceLayout {
    name: "mpu9250",
    window_size: 180,
    register_size: 180,
    access: Access::ReadWrite,
    session: SessionPolicy::Exclusive,
    unset: b' ',
    fields: &MPU9250_FIELDS,
    event: Some(EventLayout {
        region: Span::new(mpu9250::EVENT, 48),
        accel: Span::new(mpu9250::SAMPLE, 36),
        zero: Span::new(mpu9250::TIMESTAMP, mpu9250::CONFIG - mpu9250::TIMESTAMP),
        timestamp_source: 36,
        timestamp_dest: mpu9250::TIMESTAMP,
        timestamp_len: 8,
    }),
    notification: Some(Notification::MOTION_EVENT),
    readback: Readback::Registers,
};

/// Earlier motion sensor firmware: streaming snapshot only.
pub const MPU9250_LEGACY: DeviceLayout = DeviceLayout {
    name: "mpu9250-legacy",
    window_size: 148,
    register_size: 148,
    access: Access::ReadOnly,
    session: SessionPolicy::Shared,
    unset: 0,
    fields: &[],
    event: None,
    notification: None,
    readback: Readback::Registers,
};

/// Ambient light sensor.
pub const APDS9301: DeviceLayout = DeviceLayout {
    name: "apds9301",
    window_size: 48,
    register_size: 48,
    ..MPU9250_LEGACY
};

/// Humidity and temperature sensor.
pub const HDC1000: DeviceLayout = DeviceLayout {
    name: "hdc1000",
    ..APDS9301
};

const SEVEN_SEGMENT_FIELDS: [ConfigField; 2] = [
    ConfigField::new(
        "digits",
        0,
        6,
        Encoding::AsciiHex,
        Sink::MaskedRegister {
            value: seven_segment::VALUE,
            mask: seven_segment::ENABLE,
        },
    ),
    ConfigField::new("pwm", 6, 2, Encoding::AsciiHex, Sink::Register(seven_segment::PWM)),
];

/// Six-digit display; reads echo the text last written.
pub const SEVEN_SEGMENT: DeviceLayout = DeviceLayout {
    name: "seven-segment",
    window_size: 8,
    register_size: 12,
    access: Access::ReadWrite,
    session: SessionPolicy::Shared,
    unset: 0,
    fields: &SEVEN_SEGMENT_FIELDS,
    event: None,
    notification: None,
    readback: Readback::ConfigImage,
};

/// Every shipped variant.
pub const ALL: &[&DeviceLayout] = &[
    &MPU9250,
    &MPU9250_LEGACY,
    &APDS9301,
    &HDC1000,
    &SEVEN_SEGMENT,
];
