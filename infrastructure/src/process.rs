//! Child process helpers shared by the browser and interpreter adapters

use tokio::process::Command;

/// Make a child process die with us.
///
/// The child is killed when its handle is dropped (timeouts, cancelled
/// runs). On Linux the kernel additionally sends SIGTERM to the child when
/// the server process dies without running destructors (SIGKILL, OOM kill).
pub fn bind_to_parent(cmd: &mut Command) {
    cmd.kill_on_drop(true);

    #[cfg(target_os = "linux")]
    unsafe {
        cmd.pre_exec(|| {
            libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
            Ok(())
        });
    }
}

/// Last non-empty line of a process' stderr, for error messages
pub fn last_stderr_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}
