//! Publish/subscribe socket pair used to move encoded frames.
//!
//! The bus is a pair of one-directional TCP channels with pub/sub semantics:
//!
//! - `PubSocket` — binds a listener, accepts subscribers on a background
//!   thread, and fans each frame out to every attached peer. A frame sent
//!   while no subscriber is attached is dropped, as pub/sub allows.
//! - `SubSocket` — connects to a remote publisher, installs a topic prefix
//!   filter (empty = accept everything), and reads one newline-delimited
//!   frame per call under a bounded timeout so callers can keep observing
//!   their shutdown flag.
//!
//! Framing is one frame per line; the payloads this workspace sends are
//! JSON objects, which never contain a raw newline.
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error, warn};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crate::error::TickrError;
use crate::net::RECV_TIMEOUT_MS;

/// Connection attempts made before a subscriber gives up on its publisher.
const CONNECT_ATTEMPTS: u32 = 5;
/// Pause between subscriber connection attempts, in milliseconds.
const CONNECT_RETRY_MS: u64 = 500;

/// Publishing side of the bus: fan-out of frames to attached subscribers.
pub struct PubSocket {
    peers: Vec<TcpStream>,
    accept_rx: Receiver<TcpStream>,
    local_addr: SocketAddr,
}

impl PubSocket {
    /// Bind a publisher to `bind_addr` (e.g., `0.0.0.0:5556`) and start
    /// accepting subscribers in the background.
    pub fn bind(bind_addr: &str) -> Result<Self, TickrError> {
        let listener = TcpListener::bind(bind_addr)?;
        let local_addr = listener.local_addr()?;
        let (accept_tx, accept_rx) = unbounded::<TcpStream>();

        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        if accept_tx.send(stream).is_err() {
                            break;
                        }
                    }
                    Err(e) => error!("Subscriber accept error: {}", e),
                }
            }
        });

        Ok(Self {
            peers: Vec::new(),
            accept_rx,
            local_addr,
        })
    }

    /// Address the publisher is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn drain_new_peers(&mut self) {
        while let Ok(stream) = self.accept_rx.try_recv() {
            debug!("Subscriber attached: {:?}", stream.peer_addr());
            self.peers.push(stream);
        }
    }

    /// Block until at least one subscriber has attached, or `timeout`
    /// elapses. Returns `true` if a peer is attached.
    pub fn wait_for_subscriber(&mut self, timeout: Duration) -> bool {
        self.drain_new_peers();
        if !self.peers.is_empty() {
            return true;
        }
        match self.accept_rx.recv_timeout(timeout) {
            Ok(stream) => {
                debug!("Subscriber attached: {:?}", stream.peer_addr());
                self.peers.push(stream);
                true
            }
            Err(_) => false,
        }
    }

    /// Publish one frame to every attached subscriber.
    ///
    /// Peers whose connection has gone away are dropped on write failure;
    /// the frame still reaches the remaining ones.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), TickrError> {
        self.drain_new_peers();

        let mut wire = Vec::with_capacity(frame.len() + 1);
        wire.extend_from_slice(frame);
        wire.push(b'\n');

        self.peers.retain_mut(|peer| match peer.write_all(&wire) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping unreachable subscriber: {}", e);
                false
            }
        });
        Ok(())
    }
}

/// Subscribing side of the bus: bounded-timeout reads from one publisher.
pub struct SubSocket {
    reader: BufReader<TcpStream>,
    filter: String,
    line: String,
}

impl SubSocket {
    /// Connect to the publisher at `addr`, retrying briefly while the peer
    /// comes up, and arm the bounded read timeout.
    pub fn connect(addr: &str) -> Result<Self, TickrError> {
        let stream = Self::connect_with_retry(addr)?;
        stream.set_read_timeout(Some(Duration::from_millis(RECV_TIMEOUT_MS)))?;
        Ok(Self {
            reader: BufReader::new(stream),
            filter: String::new(),
            line: String::new(),
        })
    }

    fn connect_with_retry(addr: &str) -> Result<TcpStream, TickrError> {
        let mut last_err = String::new();
        for attempt in 1..=CONNECT_ATTEMPTS {
            match TcpStream::connect(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    warn!(
                        "Connect to {} failed (attempt {}/{}): {}",
                        addr, attempt, CONNECT_ATTEMPTS, e
                    );
                    last_err = e.to_string();
                }
            }
            thread::sleep(Duration::from_millis(CONNECT_RETRY_MS));
        }
        Err(TickrError::TransportFailed(format!(
            "Could not connect to publisher at {}: {}",
            addr, last_err
        )))
    }

    /// Install a topic prefix filter. The empty prefix accepts every frame.
    pub fn set_filter(&mut self, prefix: &str) {
        self.filter = String::from(prefix);
    }

    /// Attempt to read one frame within the bounded timeout.
    ///
    /// Returns `None` on timeout, on a filtered-out frame, or when the
    /// publisher has closed the connection. A frame interrupted by the
    /// timeout stays buffered and completes on a later call.
    pub fn recv(&mut self) -> Option<Vec<u8>> {
        match self.reader.read_line(&mut self.line) {
            Ok(0) => {
                self.line.clear();
                None
            }
            Ok(_) => {
                if !self.line.ends_with('\n') {
                    // EOF in the middle of a frame; drop the fragment.
                    self.line.clear();
                    return None;
                }
                let frame = self.line.trim_end().to_owned();
                self.line.clear();
                if frame.is_empty() || !frame.starts_with(&self.filter) {
                    return None;
                }
                Some(frame.into_bytes())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => None,
            Err(e) => {
                debug!("Receive error treated as empty tick: {}", e);
                None
            }
        }
    }
}
