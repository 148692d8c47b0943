//! Per-thread isolation of TLS slots shared between running threads.

use core::ffi::c_void;
use std::{
    sync::{Arc, Barrier},
    thread,
};

use ost_sys_thread_tls::{TlsData, TlsSlot};

#[test_log::test]
fn value_set_by_one_thread_is_invisible_to_a_concurrent_thread() {
    let tls = Arc::new(TlsData::new().expect("tls key"));
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let tls = Arc::clone(&tls);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            tls.set(42 as *mut c_void).expect("set");
            let seen = tls.get() as usize;
            // Let the reader look while the value is still set here.
            barrier.wait();
            barrier.wait();
            seen
        })
    };

    let reader = {
        let tls = Arc::clone(&tls);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let seen = tls.get() as usize;
            barrier.wait();
            seen
        })
    };

    assert_eq!(writer.join().unwrap(), 42);
    assert_eq!(reader.join().unwrap(), 0);
    assert!(tls.get().is_null());
}

#[test_log::test]
fn every_thread_keeps_its_own_value() {
    let slot = Arc::new(TlsSlot::<u8>::new().expect("tls key"));

    let handles: Vec<_> = (1..=8usize)
        .map(|i| {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                slot.set(i as *mut u8).expect("set");
                thread::yield_now();
                slot.get() as usize
            })
        })
        .collect();

    for (i, handle) in (1..=8usize).zip(handles) {
        assert_eq!(handle.join().unwrap(), i);
    }
}

#[test_log::test]
fn keys_can_be_allocated_and_released_repeatedly() {
    for _ in 0..256 {
        let tls = TlsData::new().expect("tls key");
        tls.set(1 as *mut c_void).expect("set");
        assert_eq!(tls.get() as usize, 1);
    }
}
