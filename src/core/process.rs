//! # Process control: fork/exec, signalling and reaping.
//!
//! [`ProcessControl`] is the seam between the supervisor core and the operating system.
//! [`OsProcess`] is the real implementation on top of `nix`; tests plug in a scripted fake.
//!
//! ## Child side of a spawn
//! ```text
//! fork()
//!   ├─ parent: Ok(pid)
//!   └─ child:  reset every catchable signal to SIG_DFL
//!              clear the signal mask
//!              execv(argv[0], argv)
//!              on failure: write "exec failed" to stderr, _exit(errno)
//! ```
//! The reset must happen between fork and exec: the supervisor's handlers and mask
//! would otherwise leak into the new process image.
//!
//! Only async-signal-safe calls run in the child; every C string is prepared before `fork`.

use std::ffi::CString;
use std::fmt;
use std::io;
use std::os::unix::ffi::OsStrExt;

use nix::errno::Errno;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execv, fork, write, ForkResult, Pid};

use crate::config::Config;
use crate::error::ConfigError;
use crate::signals::SignalName;

/// How a child process ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildStatus {
    /// Normal exit with the given code.
    Exited(i32),
    /// Killed by a signal.
    Signaled(Signal),
    /// The pid can no longer be waited on (already reaped elsewhere).
    Lost,
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildStatus::Exited(code) => write!(f, "exit {code}"),
            ChildStatus::Signaled(sig) => write!(f, "signal {}", sig.as_str()),
            ChildStatus::Lost => f.write_str("lost"),
        }
    }
}

/// Operations the supervisor needs from the OS.
pub trait ProcessControl {
    /// Creates a new process running the configured program for `slot`.
    ///
    /// `Err` means no process was created.
    fn spawn(&mut self, slot: usize) -> Result<Pid, Errno>;

    /// Sends `sig` to `pid`.
    fn kill(&mut self, pid: Pid, sig: SignalName) -> Result<(), Errno>;

    /// Non-blocking wait on one pid: `Ok(None)` while it is still running.
    fn try_wait(&mut self, pid: Pid) -> Result<Option<ChildStatus>, Errno>;
}

/// Real fork/exec process control.
pub struct OsProcess {
    path: CString,
    argv: Vec<CString>,
}

impl OsProcess {
    /// Prepares the program path and argv from the configuration.
    pub fn new(cfg: &Config) -> Result<Self, ConfigError> {
        let argv = cfg
            .argv
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes()).map_err(|_| ConfigError::NulByte {
                    arg: arg.to_string_lossy().into_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let path = argv.first().cloned().ok_or(ConfigError::MissingProgram)?;
        Ok(Self { path, argv })
    }

    /// Runs in the forked child; never returns.
    fn exec_child(&self) -> ! {
        reset_signal_disposition();

        let err = match execv(&self.path, &self.argv) {
            Ok(never) => match never {},
            Err(e) => e,
        };

        let stderr = io::stderr();
        let _ = write(&stderr, b"forkwatch: exec failed: ");
        let _ = write(&stderr, err.desc().as_bytes());
        let _ = write(&stderr, b"\n");

        // SAFETY: `_exit` skips atexit handlers and destructors that belong to the supervisor.
        unsafe { nix::libc::_exit(err as i32) }
    }
}

impl ProcessControl for OsProcess {
    fn spawn(&mut self, _slot: usize) -> Result<Pid, Errno> {
        // SAFETY: the child branch only calls async-signal-safe functions before exec/_exit,
        // and all allocations it relies on were made before the fork.
        match unsafe { fork() }? {
            ForkResult::Parent { child } => Ok(child),
            ForkResult::Child => self.exec_child(),
        }
    }

    fn kill(&mut self, pid: Pid, sig: SignalName) -> Result<(), Errno> {
        signal::kill(pid, sig.to_signal())
    }

    fn try_wait(&mut self, pid: Pid) -> Result<Option<ChildStatus>, Errno> {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG))? {
            WaitStatus::Exited(_, code) => Ok(Some(ChildStatus::Exited(code))),
            WaitStatus::Signaled(_, sig, _) => Ok(Some(ChildStatus::Signaled(sig))),
            _ => Ok(None),
        }
    }
}

/// Restores the default disposition of every catchable signal and clears the mask.
///
/// Covers more than the listened signals: the Rust runtime starts with `SIGPIPE` ignored, and
/// an ignored disposition survives `execv`.
fn reset_signal_disposition() {
    let dfl = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    for sig in Signal::iterator().filter(|s| !matches!(s, Signal::SIGKILL | Signal::SIGSTOP)) {
        // SAFETY: installing SIG_DFL has no handler code to race with.
        let _ = unsafe { signal::sigaction(sig, &dfl) };
    }
    let _ = signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&SigSet::empty()), None);
}
