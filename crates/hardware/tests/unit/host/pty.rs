//! Pseudo-Terminal Tests.
//!
//! Exercise `PtyFile` against a real slave descriptor opened by the test.

use std::io::{Read, Write};
use std::os::unix::fs::FileTypeExt;
use std::thread;
use std::time::{Duration, Instant};

use ptysim_core::host::{HostChannel, PtyFile};

use crate::common::harness::{PTY_TIMEOUT, init_logging, open_slave};

fn wait_for(channel: &PtyFile) -> bool {
    let deadline = Instant::now() + PTY_TIMEOUT;
    while Instant::now() < deadline {
        if channel.readable().unwrap() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn open_reports_char_device_path() {
    let pty = PtyFile::open().unwrap();
    let path = pty.device_path();
    assert!(path.starts_with("/dev/"), "{path}");
    let meta = std::fs::metadata(path).unwrap();
    assert!(meta.file_type().is_char_device());
}

#[test]
fn two_opens_give_distinct_devices() {
    let a = PtyFile::open().unwrap();
    let b = PtyFile::open().unwrap();
    assert_ne!(a.device_path(), b.device_path());
}

#[test]
fn nothing_readable_until_slave_writes() {
    let pty = PtyFile::open().unwrap();
    let _slave = open_slave(pty.device_path());
    // Polling is idempotent and never blocks.
    for _ in 0..10 {
        assert!(!pty.readable().unwrap());
    }
}

#[test]
fn slave_to_master_bytes_are_raw() {
    init_logging();
    let pty = PtyFile::open().unwrap();
    let mut slave = open_slave(pty.device_path());
    slave.write_all(b"AB").unwrap();

    assert!(wait_for(&pty));
    assert_eq!(pty.read_byte().unwrap(), b'A');
    assert!(wait_for(&pty));
    assert_eq!(pty.read_byte().unwrap(), b'B');
}

#[test]
fn master_writes_reach_slave_without_echo() {
    let pty = PtyFile::open().unwrap();
    let mut slave = open_slave(pty.device_path());
    assert!(pty.writable().unwrap());
    pty.write_byte(b'Z').unwrap();

    let mut buf = [0u8; 1];
    slave.read_exact(&mut buf).unwrap();
    assert_eq!(buf[0], b'Z');

    // Raw mode: the master must not see its own byte echoed back.
    thread::sleep(Duration::from_millis(20));
    assert!(!pty.readable().unwrap());
}
