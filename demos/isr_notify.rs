//! Simulated motion interrupt notifying this process through a queued signal.
//!
//! A thread stands in for the interrupt handler and fires the trigger line;
//! the main thread registers itself as the consumer and waits for the signal.

use std::{mem::MaybeUninit, process, thread, time::Duration};

use register_bridge::prelude::*;

fn main() {
    let signal = Notification::MOTION_EVENT.signal.get();
    // Block the signal in every thread so it stays queued for sigtimedwait.
    let set = unsafe {
        let mut set = MaybeUninit::<libc::sigset_t>::uninit();
        libc::sigemptyset(set.as_mut_ptr());
        libc::sigaddset(set.as_mut_ptr(), signal);
        libc::pthread_sigmask(libc::SIG_BLOCK, set.as_ptr(), std::ptr::null_mut());
        set.assume_init()
    };

    let mut block = MemoryBlock::<180>::new();
    block.load(variants::mpu9250::EVENT, &[0x42; 36]);

    let bridge = BridgeBuilder::new()
        .window_size::<180>()
        .layout(&variants::MPU9250)
        .registry(SignalRegistry)
        .attach(block);

    let mut endpoint = bridge.open().expect("fresh device is free");
    let config = format!("ACCEL2G;Q1{:011}", process::id());
    endpoint.write(0, config.as_bytes()).expect("config write");
    println!("registered pid {}, mode {:?}", process::id(), endpoint.mode());

    thread::scope(|s| {
        let line = bridge.trigger_line();
        s.spawn(move || {
            thread::sleep(Duration::from_millis(50));
            println!("interrupt: {:?}", line.fire());
        });

        let timeout = libc::timespec {
            tv_sec: 2,
            tv_nsec: 0,
        };
        let mut info = MaybeUninit::<libc::siginfo_t>::uninit();
        let got = unsafe { libc::sigtimedwait(&set, info.as_mut_ptr(), &timeout) };
        if got == signal {
            let payload = unsafe { info.assume_init().si_value().sival_ptr } as isize;
            println!("signal {got} received, payload {payload}");
        } else {
            println!("no signal within timeout");
        }
    });

    let mut frame = [0u8; 180];
    endpoint.read(0, &mut frame).expect("frame read");
    println!("event sample: {:02x?}", &frame[..36]);
}
