use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::thread;
use std::time::{Duration, Instant};

/// Shared counters plus an optional stderr ticker for long hashing runs.
#[derive(Clone)]
pub struct Progress {
    enabled: bool,
    interval: Duration,
    pub stage: Arc<Mutex<String>>,
    pub files_done: Arc<AtomicUsize>,
    pub files_total: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
    /// Bumped by every `start`; a ticker exits once it is no longer current.
    generation: Arc<AtomicUsize>,
    tickers: Arc<AtomicUsize>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            interval: Duration::from_secs(5),
            stage: Arc::new(Mutex::new(String::new())),
            files_done: Arc::new(AtomicUsize::new(0)),
            files_total: Arc::new(AtomicUsize::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicUsize::new(0)),
            tickers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A tracker that only counts.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn set_stage(&self, s: &str) {
        if self.enabled {
            if let Ok(mut stage) = self.stage.lock() {
                *stage = s.to_string();
            }
        }
    }
    pub fn set_files_total(&self, n: usize) {
        self.files_total.store(n, Ordering::Relaxed);
        self.files_done.store(0, Ordering::Relaxed);
    }
    pub fn inc_file(&self) {
        self.files_done.fetch_add(1, Ordering::Relaxed);
    }
    pub fn files_done(&self) -> usize {
        self.files_done.load(Ordering::Relaxed)
    }

    pub fn start(&self) {
        if !self.enabled || self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let stage = self.stage.clone();
        let done = self.files_done.clone();
        let total = self.files_total.clone();
        let running = self.running.clone();
        let generation = self.generation.clone();
        let tickers = self.tickers.clone();
        let interval = self.interval;
        let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = move || {
            running.load(Ordering::SeqCst) && generation.load(Ordering::SeqCst) == mine
        };
        tickers.fetch_add(1, Ordering::SeqCst);
        thread::spawn(move || {
            let t0 = Instant::now();
            while current() {
                thread::sleep(interval);
                if !current() {
                    break;
                }
                let s = stage.lock().map(|g| g.clone()).unwrap_or_default();
                let d = done.load(Ordering::Relaxed);
                let t = total.load(Ordering::Relaxed);
                let pct = if t > 0 { (d as f64 / t as f64) * 100.0 } else { 0.0 };
                eprintln!("[{:>4}s] {} | files {}/{} ({}%)", t0.elapsed().as_secs(), s, d, t, pct as i32);
            }
            tickers.fetch_sub(1, Ordering::SeqCst);
        });
    }
    pub fn stop(&self) {
        if self.enabled {
            self.running.store(false, Ordering::SeqCst);
        }
    }
}
