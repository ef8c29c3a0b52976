//! Real-time scheduling helpers (Linux SCHED_FIFO + mlockall).
//!
//! Pulse widths are derived from edge timestamps taken in the interrupt
//! callback, so scheduling latency turns directly into millimetres of error.

#[cfg(target_os = "linux")]
pub fn setup_rt_once(prio: Option<i32>) {
    use std::sync::OnceLock;
    static RT_ONCE: OnceLock<()> = OnceLock::new();

    #[inline]
    fn is_retryable_memlock_error(err: &std::io::Error) -> bool {
        matches!(err.raw_os_error(), Some(code) if code == libc::EPERM || code == libc::ENOMEM)
    }

    fn memlock_limit_hint() -> Option<String> {
        let mut rlim = std::mem::MaybeUninit::<libc::rlimit>::uninit();
        // SAFETY: getrlimit writes a full rlimit on success.
        let rc = unsafe { libc::getrlimit(libc::RLIMIT_MEMLOCK, rlim.as_mut_ptr()) };
        if rc != 0 {
            return None;
        }
        // SAFETY: rc == 0 means rlim was initialised.
        let cur = unsafe { rlim.assume_init() }.rlim_cur;
        if cur == libc::RLIM_INFINITY {
            Some("memlock limit: unlimited".to_string())
        } else {
            Some(format!("memlock limit: {} KiB", cur / 1024))
        }
    }

    fn mlock(flags: libc::c_int) -> std::io::Result<()> {
        // SAFETY: mlockall has no memory-safety preconditions.
        let rc = unsafe { libc::mlockall(flags) };
        if rc != 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    // Lock current|future, falling back to current only.
    fn try_apply_mem_lock() -> eyre::Result<()> {
        let err = match mlock(libc::MCL_CURRENT | libc::MCL_FUTURE) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        let mut msg = format!("mlockall(current|future) failed: {err}");
        if is_retryable_memlock_error(&err) {
            match mlock(libc::MCL_CURRENT) {
                Ok(()) => {
                    tracing::warn!(%msg, "fell back to mlockall(current)");
                    return Ok(());
                }
                Err(e2) => msg.push_str(&format!("; fallback mlockall(current) also failed: {e2}")),
            }
            if let Some(h) = memlock_limit_hint() {
                msg.push_str(&format!("; {h}"));
            }
            msg.push_str("; hint: needs CAP_IPC_LOCK (or root) and sufficient 'ulimit -l'");
        }
        Err(eyre::eyre!(msg))
    }

    // Apply SCHED_FIFO priority, clamped to the system range.
    fn try_apply_fifo_priority(prio: Option<i32>) -> eyre::Result<i32> {
        // SAFETY: plain queries without pointers.
        let (min, max) = unsafe {
            let min = libc::sched_get_priority_min(libc::SCHED_FIFO);
            let max = libc::sched_get_priority_max(libc::SCHED_FIFO);
            if min < 0 || max < 0 { (1, 99) } else { (min, max) }
        };
        let prio_val = prio.unwrap_or(max).clamp(min, max);
        let param = libc::sched_param {
            sched_priority: prio_val,
        };
        // SAFETY: param outlives the call.
        let rc = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EPERM) {
                eyre::bail!("{err}; hint: needs CAP_SYS_NICE or root");
            }
            Err(eyre::eyre!(err))
        } else {
            Ok(prio_val)
        }
    }

    RT_ONCE.get_or_init(|| {
        match try_apply_mem_lock() {
            Ok(()) => tracing::info!("RT: memory locked"),
            Err(err) => tracing::warn!(error = %err, "mlockall failed"),
        }
        match try_apply_fifo_priority(prio) {
            Ok(p) => tracing::info!(prio = p, "RT: SCHED_FIFO"),
            Err(err) => {
                let prio_dbg = prio.map_or_else(|| "(max)".to_string(), |p| p.to_string());
                tracing::warn!(error = %err, prio = %prio_dbg, "sched_setscheduler(SCHED_FIFO) failed");
            }
        }
    });
}

#[cfg(not(target_os = "linux"))]
pub fn setup_rt_once(_prio: Option<i32>) {
    tracing::warn!("--rt is only supported on Linux; ignoring");
}
