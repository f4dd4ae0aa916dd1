//! Real-time scheduling helpers (Linux SCHED_FIFO / mlockall).

use crate::cli::RtLock;

#[cfg(target_os = "linux")]
pub fn setup_rt_once(rt: bool, prio: Option<i32>, lock: RtLock) {
    use libc::{
        MCL_CURRENT, MCL_FUTURE, SCHED_FIFO, mlockall, sched_get_priority_max,
        sched_get_priority_min, sched_param, sched_setscheduler,
    };
    use std::sync::OnceLock;
    static RT_ONCE: OnceLock<()> = OnceLock::new();

    if !rt {
        return;
    }

    fn try_apply_mem_lock(lock: RtLock) -> std::io::Result<()> {
        let flags = match lock {
            RtLock::None => return Ok(()),
            RtLock::Current => MCL_CURRENT,
            RtLock::All => MCL_CURRENT | MCL_FUTURE,
        };
        let rc = unsafe { mlockall(flags) };
        if rc != 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    // Apply SCHED_FIFO priority, clamped to the system range.
    fn try_apply_fifo_priority(prio: Option<i32>) -> std::io::Result<i32> {
        let (min, max) = unsafe {
            let min = sched_get_priority_min(SCHED_FIFO);
            let max = sched_get_priority_max(SCHED_FIFO);
            if min < 0 || max < 0 {
                (1, 99)
            } else {
                (min, max)
            }
        };
        let prio_val = prio.unwrap_or(max).clamp(min, max);
        let param = sched_param {
            sched_priority: prio_val,
        };
        let rc = unsafe { sched_setscheduler(0, SCHED_FIFO, &param) };
        if rc != 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(prio_val)
        }
    }

    RT_ONCE.get_or_init(|| {
        match try_apply_mem_lock(lock) {
            Ok(()) => tracing::info!(mode = ?lock, "rt memory lock applied"),
            Err(err) => tracing::warn!(
                mode = ?lock,
                error = %err,
                "mlockall failed; needs CAP_IPC_LOCK (or root) and sufficient 'ulimit -l'"
            ),
        }
        match try_apply_fifo_priority(prio) {
            Ok(p) => tracing::info!(priority = p, "SCHED_FIFO applied"),
            Err(err) => tracing::warn!(
                priority = ?prio,
                error = %err,
                "sched_setscheduler(SCHED_FIFO) failed; needs CAP_SYS_NICE or root"
            ),
        }
    });
}

#[cfg(not(target_os = "linux"))]
pub fn setup_rt_once(rt: bool, _prio: Option<i32>, _lock: RtLock) {
    if rt {
        tracing::warn!("real-time mode is only supported on Linux; continuing without it");
    }
}
