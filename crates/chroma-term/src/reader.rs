// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reader thread.
//
// Raw input bytes are read off the loop thread and sent over an mpsc
// channel, one `Vec<u8>` per read. The loop blocks on that channel with a
// deadline, so it wakes for input or for the next tick, whichever comes
// first.
//
// All-motion mouse tracking makes stdin chatty: one SGR report per cell the
// pointer crosses. Reads are sized to take a burst of those in one chunk.
//
// The thread never blocks in `read()` without a timeout. It waits with
// `poll`, checking the stop flag between waits, so `stop` returns promptly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use crate::error::{Result, TermError};

const CHUNK_SIZE: usize = 4096;

/// Stop-flag check interval.
const WAIT_MS: i32 = 50;

/// The running reader thread. Stops it on drop.
///
/// ```no_run
/// use chroma_term::reader::StdinReader;
///
/// let (mut reader, chunks) = StdinReader::spawn()?;
/// if let Ok(bytes) = chunks.recv() {
///     println!("{} bytes", bytes.len());
/// }
/// reader.stop();
/// # Ok::<(), chroma_term::TermError>(())
/// ```
pub struct StdinReader {
    thread: Option<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start reading. The receiver yields non-empty chunks and disconnects
    /// when the thread exits (stop, EOF, or a read error).
    ///
    /// # Errors
    ///
    /// [`TermError::ReaderSpawn`] if the OS refuses the thread.
    pub fn spawn() -> Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stopping = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopping);

        let thread = thread::Builder::new()
            .name("chroma-stdin".into())
            .spawn(move || read_until_stopped(&tx, &flag))
            .map_err(TermError::ReaderSpawn)?;

        debug!("stdin reader running");
        let reader = Self {
            thread: Some(thread),
            stopping,
        };
        Ok((reader, rx))
    }

    /// Ask the thread to exit and join it. Safe to call more than once.
    pub fn stop(&mut self) {
        self.stopping.store(true, Ordering::Relaxed);
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.join().is_err() {
            debug!("stdin reader panicked");
        } else {
            debug!("stdin reader joined");
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_until_stopped(tx: &Sender<Vec<u8>>, stopping: &AtomicBool) {
    let mut buf = vec![0u8; CHUNK_SIZE];
    while !stopping.load(Ordering::Relaxed) {
        match next_chunk(&mut buf) {
            Chunk::Idle => {}
            Chunk::Data(n) => {
                trace!(bytes = n, "stdin");
                if tx.send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
            Chunk::Closed => return,
        }
    }
}

enum Chunk {
    /// Nothing to read within the wait interval.
    Idle,
    /// This many bytes were read into the buffer.
    Data(usize),
    /// EOF or an error: stop reading.
    Closed,
}

#[cfg(unix)]
fn next_chunk(buf: &mut [u8]) -> Chunk {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&raw mut pfd, 1, WAIT_MS) };
    if ready <= 0 {
        return Chunk::Idle;
    }
    if pfd.revents & libc::POLLIN == 0 {
        // POLLHUP or POLLERR without data.
        return Chunk::Closed;
    }

    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .map_or(Chunk::Closed, Chunk::Data)
}

/// Without `poll` the read blocks, so `stop` waits for the next keystroke.
#[cfg(not(unix))]
fn next_chunk(buf: &mut [u8]) -> Chunk {
    use std::io::Read;

    match std::io::stdin().lock().read(buf) {
        Ok(0) | Err(_) => Chunk::Closed,
        Ok(n) => Chunk::Data(n),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stop_joins_the_thread() {
        let (mut reader, _rx) = StdinReader::spawn().unwrap();
        reader.stop();
        assert!(reader.thread.is_none());
        reader.stop();
    }

    #[test]
    fn drop_stops_the_thread() {
        let (reader, rx) = StdinReader::spawn().unwrap();
        drop(reader);
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn stop_flag_ends_the_loop() {
        let (tx, rx) = mpsc::channel();
        let stopping = AtomicBool::new(true);
        read_until_stopped(&tx, &stopping);
        drop(tx);
        assert!(rx.recv().is_err());
    }
}
