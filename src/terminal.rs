//! Terminal mode control: scoped raw-mode access to the tty.
//!
//! [`TerminalMode`] is a guard. Creating it captures the current attribute
//! configuration and switches to per-keystroke input without echo; dropping
//! it (or calling [`TerminalMode::exit`]) puts everything back. Restoration
//! happens exactly once, whichever path ends the session.

use std::io::{self, Write};
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

use crate::capability::CapabilityMap;
use crate::types::Codename;

// ============================================================================
// DEVICES
// ============================================================================

/// A terminal whose attribute configuration can be read and replaced.
pub trait TerminalDevice {
    /// Snapshot of the full attribute configuration.
    type Attributes: Clone;

    /// Read the current configuration.
    fn attributes(&self) -> io::Result<Self::Attributes>;

    /// Replace the configuration, discarding pending input.
    fn set_attributes(&self, attributes: &Self::Attributes) -> io::Result<()>;

    /// Copy of `attributes` with canonical mode and echo switched off.
    fn menu_mode(attributes: &Self::Attributes) -> Self::Attributes;
}

/// The controlling terminal, addressed through a file descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Tty {
    fd: RawFd,
}

impl Tty {
    /// Standard input, where the menu reads its keys from.
    pub fn stdin() -> Self {
        Tty::from_fd(libc::STDIN_FILENO)
    }

    /// A terminal behind an already open descriptor. The descriptor is
    /// borrowed, never closed.
    pub fn from_fd(fd: RawFd) -> Self {
        Tty { fd }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl TerminalDevice for Tty {
    type Attributes = libc::termios;

    fn attributes(&self) -> io::Result<libc::termios> {
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        // tcgetattr fills the whole struct on success
        let rc = unsafe { libc::tcgetattr(self.fd, termios.as_mut_ptr()) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(unsafe { termios.assume_init() })
    }

    fn set_attributes(&self, attributes: &libc::termios) -> io::Result<()> {
        let rc = unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, attributes) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn menu_mode(attributes: &libc::termios) -> libc::termios {
        let mut raw = *attributes;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw
    }
}

// ============================================================================
// MODE GUARD
// ============================================================================

/// Exclusive menu-mode access to a terminal for the length of one session.
///
/// Owns the output stream so the renderer writes through the same handle
/// that restores the cursor on the way out.
pub struct TerminalMode<'a, D: TerminalDevice, W: Write> {
    device: &'a D,
    caps: &'a CapabilityMap,
    out: W,
    snapshot: Option<D::Attributes>,
}

impl<'a, D: TerminalDevice, W: Write> TerminalMode<'a, D, W> {
    /// Capture the current configuration and enter menu mode.
    ///
    /// Switches off canonical input and echo, enters keypad application
    /// mode (arrow keys then send `up`/`down` sequences) and hides the
    /// cursor. If any step after the capture fails, the captured
    /// configuration is restored before the error is returned.
    ///
    /// # Errors
    /// Attribute or output failures.
    pub fn enter(device: &'a D, caps: &'a CapabilityMap, out: W) -> io::Result<Self> {
        let snapshot = device.attributes()?;
        let menu_attributes = D::menu_mode(&snapshot);

        let mut mode = TerminalMode {
            device,
            caps,
            out,
            snapshot: Some(snapshot),
        };

        mode.device.set_attributes(&menu_attributes)?;
        mode.write(Codename::EnterApplicationMode)?;
        mode.write(Codename::CursorInvisible)?;
        mode.out.flush()?;

        log::debug!("terminal entered menu mode");
        Ok(mode)
    }

    /// Output stream of the session.
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Restore the captured configuration, show the cursor and leave
    /// application mode.
    ///
    /// # Errors
    /// The first failure; every restoration step is still attempted.
    pub fn exit(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        let Some(snapshot) = self.snapshot.take() else {
            return Ok(());
        };

        let attributes = self.device.set_attributes(&snapshot);
        let cursor = self.write(Codename::CursorVisible);
        let keypad = self.write(Codename::ExitApplicationMode);
        let flushed = self.out.flush();

        log::debug!("terminal restored");
        attributes.and(cursor).and(keypad).and(flushed)
    }

    fn write(&mut self, codename: Codename) -> io::Result<()> {
        self.out.write_all(self.caps.resolve(codename).as_bytes())
    }
}

impl<D: TerminalDevice, W: Write> Drop for TerminalMode<'_, D, W> {
    fn drop(&mut self) {
        if self.snapshot.is_some() {
            log::warn!("terminal mode dropped without exit, restoring");
            // Best-effort: nowhere left to report a failure
            let _ = self.restore();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{symbolic_map, FakeDevice, FAKE_ECHO, FAKE_ICANON};

    #[test]
    fn enter_disables_canonical_mode_and_echo() {
        let device = FakeDevice::new();
        let caps = symbolic_map();
        let mut out = Vec::new();

        let mode = TerminalMode::enter(&device, &caps, &mut out).unwrap();
        let current = device.current();
        assert_eq!(current.lflag & (FAKE_ICANON | FAKE_ECHO), 0);
        mode.exit().unwrap();
    }

    #[test]
    fn enter_writes_keypad_and_hides_cursor() {
        let device = FakeDevice::new();
        let caps = symbolic_map();
        let mut out = Vec::new();

        let mode = TerminalMode::enter(&device, &caps, &mut out).unwrap();
        drop(mode);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<smkx><civis>"));
    }

    #[test]
    fn exit_restores_exact_snapshot() {
        let device = FakeDevice::new();
        let before = device.current();
        let caps = symbolic_map();
        let mut out = Vec::new();

        let mode = TerminalMode::enter(&device, &caps, &mut out).unwrap();
        mode.exit().unwrap();

        assert_eq!(device.current(), before);
        assert_eq!(String::from_utf8(out).unwrap(), "<smkx><civis><cnorm><rmkx>");
    }

    #[test]
    fn drop_restores_once() {
        let device = FakeDevice::new();
        let before = device.current();
        let caps = symbolic_map();
        let mut out = Vec::new();

        {
            let _mode = TerminalMode::enter(&device, &caps, &mut out).unwrap();
        }

        assert_eq!(device.current(), before);
        // one set to enter, one to restore
        assert_eq!(device.set_count(), 2);
    }

    #[test]
    fn exit_then_drop_does_not_restore_twice() {
        let device = FakeDevice::new();
        let caps = symbolic_map();
        let mut out = Vec::new();

        let mode = TerminalMode::enter(&device, &caps, &mut out).unwrap();
        mode.exit().unwrap();

        assert_eq!(device.set_count(), 2);
        assert_eq!(String::from_utf8(out).unwrap().matches("<cnorm>").count(), 1);
    }

    #[test]
    fn failed_enter_after_capture_still_restores() {
        let device = FakeDevice::new();
        let before = device.current();
        device.fail_next_set();
        let caps = symbolic_map();
        let mut out = Vec::new();

        let failed = TerminalMode::enter(&device, &caps, &mut out).is_err();

        assert!(failed);
        assert_eq!(device.current(), before);
        assert_eq!(device.set_count(), 2);
        assert!(String::from_utf8(out).unwrap().contains("<cnorm><rmkx>"));
    }

    #[test]
    fn failed_capture_touches_nothing() {
        let device = FakeDevice::new();
        device.fail_reads();
        let caps = symbolic_map();
        let mut out = Vec::new();

        assert!(TerminalMode::enter(&device, &caps, &mut out).is_err());
        assert_eq!(device.set_count(), 0);
        assert!(out.is_empty());
    }
}
