//! Periodic cycle: read → step → write.
//!
//! Drives the [`GateController`] once per tick against a [`GateDriver`],
//! measuring cycle time and counting overruns.
//!
//! ## RT Setup Sequence
//! 1. `mlockall(MCL_CURRENT | MCL_FUTURE)`: lock all pages.
//! 2. Prefault stack pages.
//! 3. `sched_setaffinity`: pin to the configured CPU core.
//! 4. `sched_setscheduler(SCHED_FIFO, prio)`.
//!
//! ## Cycle Loop
//! With the `rt` feature, absolute-time sleep on `CLOCK_MONOTONIC` for
//! drift-free pacing. Otherwise `std::thread::sleep` for the remainder of
//! the tick. An overrun is counted and logged at WARN; the loop keeps
//! running.

use std::sync::atomic::{AtomicBool, Ordering};

use gate_common::gate::io::OutputActuation;
use gate_common::hal::driver::{GateDriver, HalError};
use tracing::{debug, error, info, warn};

use crate::controller::GateController;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
    /// Maximum wake-up latency [ns].
    pub max_latency_ns: i64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors during RT setup or cycle execution.
#[derive(Debug)]
pub enum CycleError {
    /// RT system call failed.
    RtSetup(String),
    /// Driver read/write failed.
    Driver(HalError),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RtSetup(msg) => write!(f, "RT setup error: {msg}"),
            Self::Driver(e) => write!(f, "driver error: {e}"),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Driver(e) => Some(e),
            Self::RtSetup(_) => None,
        }
    }
}

impl From<HalError> for CycleError {
    fn from(e: HalError) -> Self {
        Self::Driver(e)
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Touch 256 KiB of stack so the loop does not fault pages in.
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid, exclusive reference into `buf`.
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Pin the current thread to a specific CPU core.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(())
}

/// Set SCHED_FIFO with the given RT priority.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` outlives the call; pid 0 is the calling thread.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Perform the RT setup sequence. All steps but the stack prefault are
/// no-ops without the `rt` feature.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    debug!(cpu_core, rt_priority, rt = cfg!(feature = "rt"), "RT setup complete");
    Ok(())
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the controller and the driver and paces the tick.
pub struct CycleRunner<D: GateDriver> {
    controller: GateController,
    driver: D,
    stats: CycleStats,
    /// Configured tick period [ns].
    cycle_time_ns: i64,
}

impl<D: GateDriver> CycleRunner<D> {
    pub fn new(controller: GateController, driver: D) -> Self {
        let cycle_time_ns =
            i64::try_from(controller.config().tick_period().as_nanos()).unwrap_or(i64::MAX);
        Self {
            controller,
            driver,
            stats: CycleStats::new(),
            cycle_time_ns,
        }
    }

    #[inline]
    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// One tick: read inputs, step the controller, write outputs.
    ///
    /// On a read failure the outputs are forced off before the error is
    /// returned; the controller is not stepped.
    pub fn run_cycle(&mut self) -> Result<OutputActuation, CycleError> {
        let input = match self.driver.read_inputs() {
            Ok(input) => input,
            Err(e) => {
                error!("input read failed: {e}");
                if let Err(off) = self.driver.write_outputs(&OutputActuation::OFF) {
                    error!("failed to de-energize outputs: {off}");
                }
                return Err(e.into());
            }
        };
        let output = self.controller.step(&input);
        self.driver.write_outputs(&output)?;
        Ok(output)
    }

    /// Run until `running` is cleared, `max_ticks` cycles have run, or a
    /// driver error occurs. The driver is shut down in every case.
    pub fn run(&mut self, running: &AtomicBool, max_ticks: Option<u64>) -> Result<(), CycleError> {
        info!(
            driver = self.driver.name(),
            tick_ms = self.controller.config().tick_period_ms,
            "cycle loop starting"
        );

        #[cfg(feature = "rt")]
        let result = self.run_rt_loop(running, max_ticks);
        #[cfg(not(feature = "rt"))]
        let result = self.run_sim_loop(running, max_ticks);

        let shutdown = self.driver.shutdown();
        info!(
            cycles = self.stats.cycle_count,
            overruns = self.stats.overruns,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            state = %self.controller.state(),
            "cycle loop stopped"
        );
        result?;
        shutdown.map_err(CycleError::from)
    }

    fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.stats.record(duration_ns, latency_ns);
        if duration_ns > self.cycle_time_ns {
            self.stats.overruns += 1;
            warn!(
                cycle = self.stats.cycle_count,
                actual_ns = duration_ns,
                budget_ns = self.cycle_time_ns,
                "cycle overrun"
            );
        }
    }

    /// RT cycle loop using `clock_nanosleep(TIMER_ABSTIME)`.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self, running: &AtomicBool, max_ticks: Option<u64>) -> Result<(), CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let now = || {
            clock_gettime(clock).map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))
        };
        let mut next_wake = now()?;

        while running.load(Ordering::Relaxed) && !limit_reached(&self.stats, max_ticks) {
            let cycle_start = now()?;
            let wake_latency_ns = timespec_diff_ns(&cycle_start, &next_wake).abs();
            next_wake = timespec_add_ns(next_wake, self.cycle_time_ns);

            self.run_cycle()?;

            let cycle_end = now()?;
            self.record(timespec_diff_ns(&cycle_end, &cycle_start), wake_latency_ns);

            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }

    /// Simulation cycle loop using `std::thread::sleep`.
    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self, running: &AtomicBool, max_ticks: Option<u64>) -> Result<(), CycleError> {
        use std::time::{Duration, Instant};

        let cycle_duration = Duration::from_nanos(self.cycle_time_ns.unsigned_abs());

        while running.load(Ordering::Relaxed) && !limit_reached(&self.stats, max_ticks) {
            let cycle_start = Instant::now();

            self.run_cycle()?;

            let elapsed = cycle_start.elapsed();
            let duration_ns = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
            self.record(duration_ns, 0);

            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }
}

fn limit_reached(stats: &CycleStats, max_ticks: Option<u64>) -> bool {
    max_ticks.is_some_and(|max| stats.cycle_count >= max)
}

// ─── Time Helpers ───────────────────────────────────────────────────

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Tests ──────────────────────────────────────────────────────────
