use serde::Serialize;
#[cfg(feature = "cli")]
use parking_lot::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

/// 某個課程結束時的行程快照
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeSample {
    pub label: String,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub elapsed_ms: u64,
}

#[cfg(feature = "cli")]
pub struct RuntimeMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    samples: Mutex<Vec<RuntimeSample>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl RuntimeMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("⚠️ Runtime monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            started: Instant::now(),
            samples: Mutex::new(Vec::new()),
            enabled: enabled && pid.is_some(),
        }
    }

    /// 記錄一筆快照並輸出到日誌
    pub fn sample(&self, label: &str) -> Option<RuntimeSample> {
        if !self.enabled {
            return None;
        }
        let pid = self.pid?;

        let sample = {
            let mut system = self.system.lock();
            system.refresh_all();
            let process = system.process(pid)?;
            RuntimeSample {
                label: label.to_string(),
                cpu_usage: process.cpu_usage(),
                memory_mb: process.memory() / 1024 / 1024,
                elapsed_ms: self.started.elapsed().as_millis() as u64,
            }
        };

        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Time: {}ms",
            sample.label,
            sample.cpu_usage,
            sample.memory_mb,
            sample.elapsed_ms
        );
        self.samples.lock().push(sample.clone());
        Some(sample)
    }

    pub fn samples(&self) -> Vec<RuntimeSample> {
        self.samples.lock().clone()
    }

    pub fn log_summary(&self) {
        let samples = self.samples.lock();
        if let Some(peak) = samples.iter().map(|s| s.memory_mb).max() {
            tracing::info!(
                "📊 Final Stats - Total Time: {}ms, Peak Memory: {}MB, Samples: {}",
                self.started.elapsed().as_millis(),
                peak,
                samples.len()
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境不收集行程資訊
#[cfg(not(feature = "cli"))]
pub struct RuntimeMonitor;

#[cfg(not(feature = "cli"))]
impl RuntimeMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn sample(&self, _label: &str) -> Option<RuntimeSample> {
        None
    }

    pub fn samples(&self) -> Vec<RuntimeSample> {
        Vec::new()
    }

    pub fn log_summary(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl Default for RuntimeMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
