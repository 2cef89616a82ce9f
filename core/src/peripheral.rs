//! The console peripheral: a background thread that polls `IO_PRINTC_ENABLE`
//! and, once it sees a write, reads the byte at `IO_PRINTC_DATA`, prints it,
//! and clears the flag. One `AtomicU8` is the entire handshake; no locks, no
//! channels (§4.5).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::memory::Memory;

/// How often the background thread polls the enable flag when idle.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the background thread backing the memory-mapped console. Dropping a
/// `Console` without calling [`Console::stop`] leaves the thread running;
/// callers are expected to call `stop` explicitly, mirroring the reference
/// implementation's explicit `Start`/`Stop` pair.
pub struct Console {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Console {
    /// Spawns the polling thread against `memory` at the given fixed ports.
    pub fn start(memory: Memory, io_printc_data: u64, io_printc_enable: u64) -> Console {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop_flag = stop_flag.clone();

        let handle = std::thread::spawn(move || {
            while !thread_stop_flag.load(Ordering::Relaxed) {
                let enabled = memory.load_u8(io_printc_enable, Ordering::Acquire);
                if enabled != 0 {
                    let byte = memory.read_u8(io_printc_data);
                    print!("{}", byte as char);
                    use std::io::Write;
                    let _ = std::io::stdout().flush();
                    memory.store_u8(io_printc_enable, 0, Ordering::Release);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        });

        Console { stop_flag, handle: Some(handle) }
    }

    /// Signals the background thread to stop and joins it. Blocks for at
    /// most one poll interval.
    pub fn stop(mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
