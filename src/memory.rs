//! Peak process memory sampling for the `debug` diagnostic.
//!
//! A background thread samples resident set size while inference runs; the
//! peak is read back once the call finishes. whisper.cpp does not expose a
//! reserved-VRAM counter through whisper-rs, so RSS is the portable proxy.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SAMPLE_INTERVAL_MS: u64 = 5;
const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

/// Samples RSS on a background thread from construction until `stop`.
pub struct PeakMemorySampler {
    max_rss: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PeakMemorySampler {
    pub fn start() -> Self {
        let max_rss = Arc::new(AtomicU64::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let max_rss_clone = Arc::clone(&max_rss);
        let stop_clone = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_clone.load(Ordering::Relaxed) {
                if let Some(rss) = current_process_rss_bytes() {
                    let mut prev = max_rss_clone.load(Ordering::Relaxed);
                    while rss > prev {
                        match max_rss_clone.compare_exchange_weak(
                            prev,
                            rss,
                            Ordering::Relaxed,
                            Ordering::Relaxed,
                        ) {
                            Ok(_) => break,
                            Err(p) => prev = p,
                        }
                    }
                }
                thread::sleep(Duration::from_millis(SAMPLE_INTERVAL_MS));
            }
        });

        Self {
            max_rss,
            stop,
            handle: Some(handle),
        }
    }

    /// Stops sampling and returns the peak observed, in bytes.
    pub fn stop(mut self) -> u64 {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.max_rss.load(Ordering::Relaxed)
    }
}

impl Drop for PeakMemorySampler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Formats a byte count as GiB with two decimals, e.g. `1.27`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GIB)
}

/// Returns current process RSS in bytes, or None on unsupported/error.
fn current_process_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        read_linux_rss()
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn read_linux_rss() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if line.starts_with("VmRSS:") {
            let rest = line.trim_start_matches("VmRSS:").trim();
            let num: u64 = rest.split_whitespace().next()?.parse().ok()?;
            return Some(num.saturating_mul(1024));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_gib_two_decimals() {
        assert_eq!(format_gib(0), "0.00");
        assert_eq!(format_gib(1 << 30), "1.00");
        assert_eq!(format_gib((1 << 30) + (1 << 29)), "1.50");
    }

    #[test]
    fn sampler_stops_cleanly() {
        let sampler = PeakMemorySampler::start();
        thread::sleep(Duration::from_millis(20));
        let peak = sampler.stop();
        // On Linux the process always has a nonzero RSS; elsewhere the
        // reader returns None and the peak stays 0.
        if cfg!(target_os = "linux") {
            assert!(peak > 0);
        }
    }
}
