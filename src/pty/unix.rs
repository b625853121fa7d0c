//! Unix pseudo-terminal pair
//!
//! # References
//!
//! - posix_openpt(3): https://man7.org/linux/man-pages/man3/posix_openpt.3.html
//! - grantpt(3), unlockpt(3), ptsname(3)
//! - termios(3), cfmakeraw

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::time::Duration;

use nix::fcntl::OFlag;
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::pty::{grantpt, posix_openpt, unlockpt, PtyMaster};
use nix::sys::termios::{self, SetArg};

use super::{PtyError, PtyResult};

/// How long the master must stay quiet before a read is considered complete
const QUIET_WINDOW_MS: u16 = 20;

const READ_CHUNK: usize = 4096;

/// A connected master/slave terminal pair
pub struct PseudoTerminal {
    /// The PTY master; owns the device
    master: PtyMaster,
    /// Duplicate of the master descriptor used for reads
    reader: File,
    /// The slave device, handed to code under test
    slave: File,
    /// Path of the slave device
    slave_path: String,
}

impl PseudoTerminal {
    /// Allocate a new pair.
    ///
    /// The slave is switched to raw mode so the line discipline passes
    /// written bytes through untouched (no `\n` to `\r\n` translation).
    pub fn open() -> PtyResult<Self> {
        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY).map_err(PtyError::OpenMaster)?;
        grantpt(&master).map_err(PtyError::GrantPty)?;
        unlockpt(&master).map_err(PtyError::UnlockPty)?;
        let slave_path = slave_name(&master)?;

        let slave = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&slave_path)
            .map_err(PtyError::OpenSlave)?;

        let mut attrs = termios::tcgetattr(&slave).map_err(PtyError::Termios)?;
        termios::cfmakeraw(&mut attrs);
        termios::tcsetattr(&slave, SetArg::TCSANOW, &attrs).map_err(PtyError::Termios)?;

        let reader = master
            .as_fd()
            .try_clone_to_owned()
            .map(File::from)
            .map_err(PtyError::Dup)?;

        tracing::debug!(%slave_path, "opened pseudo-terminal pair");

        Ok(Self {
            master,
            reader,
            slave,
            slave_path,
        })
    }

    /// The slave side, writable and recognized as a terminal
    pub fn out_stream(&self) -> &File {
        &self.slave
    }

    /// Path of the slave device (e.g. `/dev/pts/3`)
    pub fn slave_path(&self) -> &str {
        &self.slave_path
    }

    /// Block until bytes written to the slave arrive, then return them.
    ///
    /// Keeps reading while more bytes follow within a short quiet window,
    /// so output split over several writes is returned together.
    pub fn read_master(&self) -> PtyResult<String> {
        self.wait_readable(PollTimeout::NONE)?;
        self.drain()
    }

    /// Like [`PseudoTerminal::read_master`], giving up after `timeout`.
    ///
    /// Returns an empty string if nothing was written.
    pub fn read_master_timeout(&self, timeout: Duration) -> PtyResult<String> {
        let ms = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        if !self.wait_readable(PollTimeout::from(ms))? {
            return Ok(String::new());
        }
        self.drain()
    }

    /// Release both ends
    pub fn close(self) {
        tracing::debug!(slave_path = %self.slave_path, "closing pseudo-terminal pair");
        drop(self);
    }

    fn drain(&self) -> PtyResult<String> {
        let mut output = Vec::new();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match (&self.reader).read(&mut buf) {
                Ok(0) => break,
                Ok(n) => output.extend_from_slice(&buf[..n]),
                // Linux reports EIO on the master once the slave is gone
                Err(e) if e.raw_os_error() == Some(libc::EIO) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(PtyError::Read(e)),
            }
            if !self.wait_readable(PollTimeout::from(QUIET_WINDOW_MS))? {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    fn wait_readable(&self, timeout: PollTimeout) -> PtyResult<bool> {
        let mut fds = [PollFd::new(self.reader.as_fd(), PollFlags::POLLIN)];
        let n = poll(&mut fds, timeout).map_err(PtyError::Poll)?;
        Ok(n > 0
            && fds[0]
                .revents()
                .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP)))
    }
}

impl AsFd for PseudoTerminal {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn slave_name(master: &PtyMaster) -> PtyResult<String> {
    nix::pty::ptsname_r(master).map_err(PtyError::PtsName)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn slave_name(master: &PtyMaster) -> PtyResult<String> {
    // SAFETY: ptsname is not thread-safe; the result is copied out before
    // any other PTY is opened by this call path
    unsafe { nix::pty::ptsname(master) }.map_err(PtyError::PtsName)
}
