//! Pseudo-terminal master.
//!
//! Opens the controlling side of a Unix pseudo-terminal pair, configures the line
//! discipline for raw 8-bit transfer, and implements `HostChannel` on top of it
//! with zero-timeout `poll` readiness checks and single-byte `read`/`write`.
//!
//! The slave side is never opened here: it is the device path a terminal client
//! (`screen`, `picocom`, `minicom`, a test) attaches to.

use std::ffi::CStr;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use crate::common::{SimError, SimResult};
use crate::host::HostChannel;

/// Size of the buffer handed to `ptsname_r`.
#[cfg(target_os = "linux")]
const PTS_NAME_LEN: usize = 128;

/// Controlling side of a pseudo-terminal pair.
///
/// The descriptor is closed when the value is dropped.
#[derive(Debug)]
pub struct PtyFile {
    fd: OwnedFd,
    path: String,
}

impl PtyFile {
    /// Opens and prepares a new pseudo-terminal.
    ///
    /// Performs `posix_openpt(O_RDWR | O_NOCTTY)`, `grantpt`, `unlockpt`, then puts the
    /// line discipline into raw mode: 8-bit characters, no echo, no canonical input.
    ///
    /// # Errors
    ///
    /// `SimError::EndpointInit` naming the first libc call that failed.
    pub fn open() -> SimResult<Self> {
        // SAFETY: posix_openpt has no memory-safety preconditions.
        let master = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
        if master < 0 {
            return Err(SimError::endpoint_init("posix_openpt"));
        }
        // SAFETY: `master` was just returned by posix_openpt and is owned by nobody else.
        let fd = unsafe { OwnedFd::from_raw_fd(master) };

        prepare(fd.as_raw_fd())?;
        let path = slave_path(fd.as_raw_fd())?;

        tracing::debug!(fd = master, path = %path, "opened pseudo-terminal");
        Ok(Self { fd, path })
    }

    /// Polls the descriptor for `events` without blocking.
    fn poll(&self, events: libc::c_short) -> SimResult<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd.as_raw_fd(),
            events,
            revents: 0,
        };
        // SAFETY: `pfd` is a valid pollfd and nfds is 1.
        let rc = unsafe { libc::poll(&raw mut pfd, 1, 0) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(SimError::HostIo {
                call: "poll",
                source: err,
            });
        }
        Ok(pfd.revents & events != 0)
    }
}

impl HostChannel for PtyFile {
    fn readable(&self) -> SimResult<bool> {
        self.poll(libc::POLLIN)
    }

    fn writable(&self) -> SimResult<bool> {
        self.poll(libc::POLLOUT)
    }

    fn read_byte(&self) -> SimResult<u8> {
        let mut byte = 0u8;
        loop {
            // SAFETY: the destination is a single valid, writable byte.
            let n = unsafe {
                libc::read(
                    self.fd.as_raw_fd(),
                    (&raw mut byte).cast::<libc::c_void>(),
                    1,
                )
            };
            match n {
                1 => return Ok(byte),
                0 => {
                    return Err(SimError::HostIo {
                        call: "read",
                        source: io::Error::from(io::ErrorKind::UnexpectedEof),
                    });
                }
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() != io::ErrorKind::Interrupted {
                        return Err(SimError::HostIo {
                            call: "read",
                            source: err,
                        });
                    }
                }
            }
        }
    }

    fn write_byte(&self, byte: u8) -> SimResult<()> {
        loop {
            // SAFETY: the source is a single valid byte.
            let n = unsafe {
                libc::write(
                    self.fd.as_raw_fd(),
                    (&raw const byte).cast::<libc::c_void>(),
                    1,
                )
            };
            if n == 1 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if n == 0 || err.kind() != io::ErrorKind::Interrupted {
                return Err(SimError::HostIo {
                    call: "write",
                    source: err,
                });
            }
        }
    }

    fn device_path(&self) -> &str {
        &self.path
    }
}

/// Grants and unlocks the slave side, then switches the pair to raw mode.
fn prepare(fd: RawFd) -> SimResult<()> {
    // SAFETY: `fd` is an open pseudo-terminal master.
    if unsafe { libc::grantpt(fd) } != 0 {
        return Err(SimError::endpoint_init("grantpt"));
    }
    // SAFETY: as above.
    if unsafe { libc::unlockpt(fd) } != 0 {
        return Err(SimError::endpoint_init("unlockpt"));
    }

    // SAFETY: termios is plain old data; all-zero is a valid bit pattern and
    // tcgetattr overwrites it before use.
    let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: `attrs` is a valid, writable termios.
    if unsafe { libc::tcgetattr(fd, &raw mut attrs) } != 0 {
        return Err(SimError::endpoint_init("tcgetattr"));
    }
    attrs.c_cflag = (attrs.c_cflag & !libc::CSIZE) | libc::CS8;
    attrs.c_lflag &= !(libc::ECHO | libc::ICANON);
    // SAFETY: `attrs` was filled in by tcgetattr above.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw const attrs) } != 0 {
        return Err(SimError::endpoint_init("tcsetattr"));
    }
    Ok(())
}

/// Resolves the slave device path of a prepared master.
#[cfg(target_os = "linux")]
fn slave_path(fd: RawFd) -> SimResult<String> {
    let mut buf = [0 as libc::c_char; PTS_NAME_LEN];
    // SAFETY: `buf` is writable for `buf.len()` bytes.
    let rc = unsafe { libc::ptsname_r(fd, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return Err(SimError::EndpointInit {
            call: "ptsname_r",
            source: io::Error::from_raw_os_error(rc),
        });
    }
    // SAFETY: ptsname_r NUL-terminates on success.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(name.to_string_lossy().into_owned())
}

/// Resolves the slave device path of a prepared master.
#[cfg(not(target_os = "linux"))]
fn slave_path(fd: RawFd) -> SimResult<String> {
    // SAFETY: ptsname returns either NULL or a NUL-terminated static buffer; the
    // simulator is single-threaded so the buffer is not raced.
    let ptr = unsafe { libc::ptsname(fd) };
    if ptr.is_null() {
        return Err(SimError::endpoint_init("ptsname"));
    }
    // SAFETY: checked non-null above.
    let name = unsafe { CStr::from_ptr(ptr) };
    Ok(name.to_string_lossy().into_owned())
}
