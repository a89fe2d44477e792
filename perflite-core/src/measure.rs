//! High-Precision Timing
//!
//! Wall-clock interval measurement over the platform's monotonic clock, with
//! elapsed time reported as fractional nanoseconds.

use std::time::Instant;

/// Timer for measuring a single invocation or a batch
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed nanoseconds since `start`
    #[inline(always)]
    pub fn stop(&self) -> f64 {
        self.start.elapsed().as_nanos() as f64
    }
}

/// Set CPU affinity to pin the current thread to a specific core
///
/// Avoids core migrations in the middle of a measurement.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    // CPU_SET indexes a fixed-size mask and panics past its end
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "CPU index {cpu} exceeds the affinity mask size ({})",
                libc::CPU_SETSIZE
            ),
        ));
    }

    // SAFETY: cpu_set_t is plain data; zeroed is a valid empty set and the
    // pointer passed to sched_setaffinity is valid for its declared size.
    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// CPU pinning is only supported on Linux; elsewhere this does nothing.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}
