//! Live position feed: NMEA sentences over a TCP connection.
//!
//! The feed dials `host:port`, reads newline-delimited sentences and
//! publishes every valid GGA fix. When the connection drops it reports
//! `Disconnected` and, if enabled, redials with exponential backoff
//! (1 s, 2 s, 4 s, ... capped at `max_backoff`).

use std::sync::Arc;
use std::time::Duration;

use gpsmanager_core::FeedError;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

use crate::feed::{FeedEvent, FeedHub, FeedState, PositionFeed};
use crate::nmea::{self, NmeaError};

pub const DEFAULT_HOST: &str = "192.168.55.250";
pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Longest line buffered before it is treated as noise.
const MAX_LINE_LEN: usize = 1024;

#[derive(Debug, Clone)]
pub struct TcpFeedConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    /// Treat the link as lost after this long without data.
    pub idle_timeout: Option<Duration>,
    pub reconnect: bool,
    pub max_backoff: Duration,
}

impl Default for TcpFeedConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            reconnect: true,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl TcpFeedConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub struct TcpFeed {
    hub: Arc<FeedHub>,
}

impl TcpFeed {
    /// Start dialing on the current tokio runtime.
    pub fn start(config: TcpFeedConfig) -> Self {
        let hub = Arc::new(FeedHub::new("tcp"));
        let handle = tokio::spawn(run(hub.clone(), config));
        hub.attach_task(handle);
        Self { hub }
    }
}

async fn run(hub: Arc<FeedHub>, config: TcpFeedConfig) {
    let address = config.address();
    tracing::info!(%address, reconnect = config.reconnect, "TCP position feed started");

    let mut consecutive_failures: u32 = 0;
    loop {
        match connect(&address, config.connect_timeout).await {
            Ok(stream) => {
                consecutive_failures = 0;
                hub.mark_connected();
                let reason = read_sentences(&hub, stream, config.idle_timeout).await;
                hub.mark_disconnected();
                tracing::warn!(%address, error = %reason, "Position feed connection ended");
            }
            Err(e) => {
                consecutive_failures += 1;
                tracing::warn!(%address, error = %e, consecutive_failures, "Position feed connect failed");
            }
        }

        if !config.reconnect {
            break;
        }
        let backoff = calculate_backoff(consecutive_failures, config.max_backoff);
        tracing::debug!(backoff_secs = backoff.as_secs(), "Reconnecting after backoff");
        sleep(backoff).await;
    }

    tracing::info!(%address, "TCP position feed stopped");
}

async fn connect(address: &str, connect_timeout: Duration) -> Result<TcpStream, FeedError> {
    match timeout(connect_timeout, TcpStream::connect(address)).await {
        Err(_) => Err(FeedError::ConnectionTimeout {
            timeout_ms: connect_timeout.as_millis() as u64,
        }),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::InvalidInput => {
            Err(FeedError::InvalidAddress {
                address: address.to_string(),
            })
        }
        Ok(Err(e)) => Err(FeedError::ConnectionRefused {
            address: address.to_string(),
            reason: e.to_string(),
        }),
        Ok(Ok(stream)) => Ok(stream),
    }
}

/// Publish fixes until the stream ends; returns why it ended.
///
/// Never buffers more than [`MAX_LINE_LEN`] bytes of one line. An overlong
/// line is dropped and reading resumes at its last `$`, so a sentence that
/// follows junk on the same line still gets through.
async fn read_sentences(
    hub: &FeedHub,
    stream: TcpStream,
    idle_timeout: Option<Duration>,
) -> FeedError {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::with_capacity(128);

    loop {
        let room = (MAX_LINE_LEN + 1).saturating_sub(buf.len()) as u64;
        let mut limited = (&mut reader).take(room);
        let read = limited.read_until(b'\n', &mut buf);
        let result = match idle_timeout {
            Some(limit) => match timeout(limit, read).await {
                Ok(result) => result,
                Err(_) => {
                    return FeedError::ConnectionLost {
                        reason: format!("no data for {}s", limit.as_secs()),
                    }
                }
            },
            None => read.await,
        };

        match result {
            Ok(0) => {
                return FeedError::ConnectionLost {
                    reason: "closed by peer".to_string(),
                }
            }
            Ok(_) if buf.last() == Some(&b'\n') => {
                handle_line(hub, &String::from_utf8_lossy(sentence_start(&buf)));
                buf.clear();
            }
            Ok(_) if buf.len() > MAX_LINE_LEN => {
                tracing::debug!(len = buf.len(), "Discarding oversized line");
                resync(&mut buf);
            }
            Ok(_) => {}
            Err(e) => return FeedError::from(e),
        }
    }
}

/// The line from its last `$` on, or all of it when there is none.
fn sentence_start(line: &[u8]) -> &[u8] {
    match line.iter().rposition(|&b| b == b'$') {
        Some(start) => &line[start..],
        None => line,
    }
}

/// Keep only a sentence that may have started inside an overlong line.
fn resync(buf: &mut Vec<u8>) {
    match buf.iter().rposition(|&b| b == b'$') {
        Some(start) if start > 0 => {
            buf.drain(..start);
        }
        _ => buf.clear(),
    }
}

fn handle_line(hub: &FeedHub, line: &str) {
    match nmea::parse_gga(line) {
        Ok(gga) => match gga.to_fix() {
            Some(fix) => {
                hub.publish_fix(fix);
            }
            None => tracing::trace!("GGA without a valid fix"),
        },
        Err(NmeaError::Unsupported(_)) => {}
        Err(e) => tracing::debug!(error = %e, line = line.trim(), "Bad NMEA sentence"),
    }
}

/// Exponential backoff: 2^n seconds, capped at `max`.
fn calculate_backoff(consecutive_failures: u32, max: Duration) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_failures.min(20));
    Duration::from_secs(secs).min(max)
}

impl PositionFeed for TcpFeed {
    fn name(&self) -> &str {
        self.hub.name()
    }

    fn is_connected(&self) -> bool {
        self.hub.is_connected()
    }

    fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.hub.subscribe()
    }

    fn watch(&self) -> (FeedState, broadcast::Receiver<FeedEvent>) {
        self.hub.watch()
    }

    fn dispose(&self) {
        self.hub.shutdown();
    }
}

impl Drop for TcpFeed {
    fn drop(&mut self) {
        self.hub.shutdown();
    }
}
