//! Key input: raw byte chunks in, logical key events out.
//!
//! Two layers:
//! - [`KeyInputSource`]: blocking reads of raw bytes (the tty, or a script in tests)
//! - [`KeyDecoder`]: classifies one chunk via the capability reverse map
//!
//! Known limitation: one read returns whatever bytes are pending, up to
//! [`READ_CHUNK_SIZE`]. Two fast keypresses can arrive in one chunk, and a
//! slow multi-byte sequence can be split across two. Neither chunk matches
//! a known sequence, so both decode as literal keys and the menu ignores
//! them.

use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::consts::SIGINT;
use signal_hook::SigId;

use crate::capability::CapabilityMap;
use crate::terminal::Tty;
use crate::types::Codename;

/// Upper bound for one raw read; large enough for any single key sequence.
pub const READ_CHUNK_SIZE: usize = 80;

// ============================================================================
// EVENTS
// ============================================================================

/// A decoded key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Enter,
    Escape,
    /// Anything else, as text (lower-cased when case folding is on).
    Char(String),
    /// The user sent an interrupt (Ctrl+C).
    Interrupt,
}

/// One blocking read from an input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    Bytes(Vec<u8>),
    Interrupted,
}

// ============================================================================
// SOURCES
// ============================================================================

/// Blocking source of raw key bytes.
pub trait KeyInputSource {
    /// Wait, without timeout, until input or an interrupt is available.
    ///
    /// Returns at most `max` bytes.
    ///
    /// # Errors
    /// Read failures, or end of input.
    fn read_chunk(&mut self, max: usize) -> io::Result<RawInput>;
}

/// Reads keys from the terminal and turns SIGINT into [`RawInput::Interrupted`].
///
/// SIGINT is routed into a self-pipe for as long as this value lives, so
/// Ctrl+C wakes the blocking wait instead of killing the process with the
/// terminal still in menu mode.
pub struct TtyInput {
    fd: RawFd,
    wake: UnixStream,
    signal: SigId,
}

impl TtyInput {
    /// Start reading from `tty` and take over SIGINT.
    ///
    /// # Errors
    /// Pipe creation or signal registration failures.
    pub fn new(tty: &Tty) -> io::Result<Self> {
        let (wake, notify) = UnixStream::pair()?;
        wake.set_nonblocking(true)?;
        notify.set_nonblocking(true)?;
        let signal = signal_hook::low_level::pipe::register(SIGINT, notify)?;

        Ok(TtyInput {
            fd: tty.fd(),
            wake,
            signal,
        })
    }

    fn drain_wake(&self) {
        let mut sink = [0u8; 16];
        while let Ok(n) = (&self.wake).read(&mut sink) {
            if n == 0 {
                break;
            }
        }
    }

    fn read_tty(&self, max: usize) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0u8; max];
        let n = unsafe { libc::read(self.fd, buffer.as_mut_ptr().cast(), max) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            ));
        }
        buffer.truncate(n as usize);
        Ok(buffer)
    }
}

impl KeyInputSource for TtyInput {
    fn read_chunk(&mut self, max: usize) -> io::Result<RawInput> {
        loop {
            let mut fds = [
                libc::pollfd {
                    fd: self.fd,
                    events: libc::POLLIN,
                    revents: 0,
                },
                libc::pollfd {
                    fd: self.wake.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                },
            ];

            // -1: block until one of the descriptors is ready
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }

            if fds[1].revents & libc::POLLIN != 0 {
                self.drain_wake();
                log::info!("interrupt received");
                return Ok(RawInput::Interrupted);
            }

            if fds[0].revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0 {
                match self.read_tty(max) {
                    Ok(bytes) => return Ok(RawInput::Bytes(bytes)),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

impl Drop for TtyInput {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.signal);
    }
}

// ============================================================================
// DECODER
// ============================================================================

/// Classifies raw chunks into [`KeyEvent`]s using the capability reverse map.
#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder<'a> {
    caps: &'a CapabilityMap,
    ignore_case: bool,
}

impl<'a> KeyDecoder<'a> {
    pub fn new(caps: &'a CapabilityMap, ignore_case: bool) -> Self {
        Self { caps, ignore_case }
    }

    /// Block for the next key.
    ///
    /// # Errors
    /// Failures of the underlying source.
    pub fn read_next_key<S>(&self, source: &mut S) -> io::Result<KeyEvent>
    where
        S: KeyInputSource + ?Sized,
    {
        match source.read_chunk(READ_CHUNK_SIZE)? {
            RawInput::Interrupted => Ok(KeyEvent::Interrupt),
            RawInput::Bytes(bytes) => Ok(self.decode(&bytes)),
        }
    }

    /// Match a whole chunk against the known key sequences.
    pub fn decode(&self, bytes: &[u8]) -> KeyEvent {
        let text = String::from_utf8_lossy(bytes);

        match self.caps.lookup(&text) {
            Some(Codename::Up) => KeyEvent::Up,
            Some(Codename::Down) => KeyEvent::Down,
            Some(Codename::Enter) => KeyEvent::Enter,
            Some(Codename::Escape) => KeyEvent::Escape,
            _ if self.ignore_case => KeyEvent::Char(text.to_lowercase()),
            _ => KeyEvent::Char(text.into_owned()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
