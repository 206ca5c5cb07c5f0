//! Serial Transmitter Tests.

use std::io::Read;

use ptysim_core::common::SimError;
use ptysim_core::soc::EndpointRegistry;
use ptysim_core::soc::devices::SerialTx;

use crate::common::harness::{open_slave, tx_cycle};
use crate::common::mocks::{MockHost, mock_registry};

fn transmitter() -> (SerialTx, MockHost) {
    let (registry, pool) = mock_registry();
    let host = pool.host("uart");
    let tx = SerialTx::new("tx", "uart", &registry).unwrap();
    (tx, host)
}

#[test]
fn ready_follows_channel_writability() {
    let (mut tx, host) = transmitter();
    assert!(!tx.rdy());
    tx_cycle(&mut tx).unwrap();
    assert!(tx.rdy());

    host.set_blocked(true);
    tx_cycle(&mut tx).unwrap();
    assert!(!tx.rdy());
}

#[test]
fn nothing_written_without_acknowledge() {
    let (mut tx, host) = transmitter();
    tx.ports.data = b'x';
    for _ in 0..5 {
        tx_cycle(&mut tx).unwrap();
    }
    assert!(host.output().is_empty());
}

#[test]
fn acknowledge_before_ready_is_ignored() {
    let (mut tx, host) = transmitter();
    tx.ports.ack = true;
    tx.ports.data = b'x';
    // Ready is low going into the first edge.
    tx_cycle(&mut tx).unwrap();
    assert!(host.output().is_empty());
    assert!(tx.rdy());
}

#[test]
fn writes_exactly_the_acknowledged_byte() {
    let (mut tx, host) = transmitter();
    tx_cycle(&mut tx).unwrap();

    tx.ports.ack = true;
    tx.ports.data = b'Q';
    tx_cycle(&mut tx).unwrap();
    tx.ports.ack = false;
    tx.ports.data = b'R';
    tx_cycle(&mut tx).unwrap();

    assert_eq!(host.output(), b"Q");
    assert_eq!(tx.bytes_sent(), 1);
}

#[test]
fn one_byte_per_acknowledged_edge() {
    let (mut tx, host) = transmitter();
    tx_cycle(&mut tx).unwrap();
    tx.ports.ack = true;
    for &byte in b"hey" {
        tx.ports.data = byte;
        tx_cycle(&mut tx).unwrap();
    }
    assert_eq!(host.output(), b"hey");
}

#[test]
fn blocked_channel_holds_back_data() {
    let (mut tx, host) = transmitter();
    host.set_blocked(true);
    tx.ports.ack = true;
    tx.ports.data = b'z';
    for _ in 0..3 {
        tx_cycle(&mut tx).unwrap();
    }
    assert!(host.output().is_empty());

    host.set_blocked(false);
    tx_cycle(&mut tx).unwrap();
    assert!(host.output().is_empty());
    tx_cycle(&mut tx).unwrap();
    assert_eq!(host.output(), b"z");
}

#[test]
fn reset_drops_ready() {
    let (mut tx, host) = transmitter();
    tx_cycle(&mut tx).unwrap();
    assert!(tx.rdy());

    tx.ports.rst = true;
    tx.ports.ack = true;
    tx_cycle(&mut tx).unwrap();
    assert!(!tx.rdy());
    assert!(host.output().is_empty());
}

#[test]
fn write_failure_is_fatal() {
    let (mut tx, host) = transmitter();
    tx_cycle(&mut tx).unwrap();
    host.set_broken(true);
    tx.ports.ack = true;
    let err = tx_cycle(&mut tx).unwrap_err();
    assert!(matches!(err, SimError::HostIo { call: "write", .. }));
}

#[test]
fn pty_slave_receives_transmitted_bytes() {
    let registry = EndpointRegistry::new();
    let mut tx = SerialTx::new("tx", "pty-tx", &registry).unwrap();
    let mut slave = open_slave(tx.endpoint().device_path());

    tx_cycle(&mut tx).unwrap();
    assert!(tx.rdy());
    tx.ports.ack = true;
    tx.ports.data = b'K';
    tx_cycle(&mut tx).unwrap();

    let mut buf = [0u8; 1];
    slave.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [b'K']);
}
