#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PhaseTiming {
    pub phase: &'static str,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some(Self {
            system,
            pid,
            peak_memory_mb: 0,
        })
    }

    /// Returns (cpu %, memory MB, peak memory MB).
    fn sample(&mut self) -> Option<(f32, u64, u64)> {
        self.system.refresh_all();
        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
        Some((process.cpu_usage(), memory_mb, self.peak_memory_mb))
    }
}

/// Per-run phase timer. Process statistics are sampled only when enabled
/// and the `cli` feature is on.
pub struct RunMonitor {
    start: Instant,
    phase_start: Instant,
    phases: Vec<PhaseTiming>,
    #[cfg(feature = "cli")]
    probe: Option<ProcessProbe>,
}

impl RunMonitor {
    pub fn new(system_stats: bool) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            phase_start: now,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            probe: if system_stats { ProcessProbe::new() } else { None },
        }
    }

    pub fn is_sampling(&self) -> bool {
        #[cfg(feature = "cli")]
        {
            self.probe.is_some()
        }
        #[cfg(not(feature = "cli"))]
        {
            false
        }
    }

    /// Closes the current phase and starts timing the next one.
    pub fn end_phase(&mut self, phase: &'static str) {
        let elapsed = self.phase_start.elapsed();
        self.phase_start = Instant::now();
        tracing::debug!("⏱️ {} took {:?}", phase, elapsed);
        self.log_process_stats(phase);
        self.phases.push(PhaseTiming { phase, elapsed });
    }

    pub fn phases(&self) -> &[PhaseTiming] {
        &self.phases
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[cfg(feature = "cli")]
    fn log_process_stats(&mut self, phase: &str) {
        if let Some((cpu, memory_mb, peak_mb)) = self.probe.as_mut().and_then(ProcessProbe::sample) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                phase,
                cpu,
                memory_mb,
                peak_mb
            );
        }
    }

    #[cfg(not(feature = "cli"))]
    fn log_process_stats(&mut self, _phase: &str) {}

    pub fn log_final_stats(&self) {
        let breakdown: Vec<String> = self
            .phases
            .iter()
            .map(|p| format!("{}={:?}", p.phase, p.elapsed))
            .collect();
        tracing::info!(
            "📊 Final Stats - Total Time: {:?} ({})",
            self.total_elapsed(),
            breakdown.join(", ")
        );
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
