use std::process::Command;
use tracing::{error, info, warn};

/// Asks the parent process to terminate. Called when the window is closed.
///
/// Does nothing if the parent never sent `set_ppid`.
pub fn terminate_parent(pid: Option<u32>) {
    let Some(pid) = pid else {
        warn!("window closed before set_ppid; parent not signalled");
        return;
    };

    info!(pid, "signalling parent process");
    match Command::new("kill").arg(pid.to_string()).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(pid, code = ?status.code(), "kill exited with failure"),
        Err(e) => error!(pid, error = %e, "failed to run kill"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_terminate_parent_kills_the_process() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        terminate_parent(Some(child.id()));

        let deadline = Instant::now() + Duration::from_secs(5);
        let status = loop {
            if let Some(status) = child.try_wait().unwrap() {
                break status;
            }
            if Instant::now() > deadline {
                let _ = child.kill();
                panic!("process survived terminate_parent");
            }
            std::thread::sleep(Duration::from_millis(10));
        };
        // SIGTERM で終了: exit code はない
        assert!(!status.success());
        assert_eq!(status.code(), None);
    }

    #[test]
    fn test_terminate_parent_without_pid_is_a_no_op() {
        terminate_parent(None);
    }
}
