use reachprobe_core::MemorySample;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

/// Reads current memory utilization. Each call reflects only the instant it runs.
pub trait MemorySampler: Send + Sync {
    fn sample(&self) -> MemorySample;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Resident size of this process against a ceiling.
    Process { ceiling_bytes: Option<u64> },
    /// Whole-system used memory against total memory.
    System,
}

/// `sysinfo`-backed sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysinfoSampler {
    scope: Scope,
}

impl SysinfoSampler {
    /// Samples this process. Without a ceiling, total system memory is the maximum.
    pub fn process(ceiling_bytes: Option<u64>) -> Self {
        Self {
            scope: Scope::Process { ceiling_bytes },
        }
    }

    pub fn system() -> Self {
        Self {
            scope: Scope::System,
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::process(None)
    }
}

impl MemorySampler for SysinfoSampler {
    fn sample(&self) -> MemorySample {
        let mut system = System::new();
        system.refresh_memory();

        match self.scope {
            Scope::System => MemorySample {
                used_bytes: system.used_memory(),
                max_bytes: system.total_memory(),
            },
            Scope::Process { ceiling_bytes } => MemorySample {
                used_bytes: resident_bytes(&mut system).unwrap_or(0),
                max_bytes: ceiling_bytes.unwrap_or_else(|| system.total_memory()),
            },
        }
    }
}

fn resident_bytes(system: &mut System) -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );
    system.process(pid).map(|process| process.memory())
}
