//! FAST feed server example with an SPSC lock-free channel.
//!
//! This example demonstrates a FAST market data feed using a
//! Single-Producer Single-Consumer channel between the tick generator
//! thread and the network broadcaster task. Frames are encoded against
//! the shared quote template, so any client holding the same template
//! decodes them with a plain session.
//!
//! Architecture:
//! ```text
//! ┌─────────────────┐     SPSC Channel      ┌─────────────────┐
//! │   Quote Tick    │ ──────────────────▶   │   Network I/O   │
//! │   Generator     │   (lock-free)         │     Thread      │
//! │   (Producer)    │                       │   (Consumer)    │
//! └─────────────────┘                       └─────────────────┘
//!         │                                         │
//!         │ Generates ticks                         │ Sends to clients
//!         ▼                                         ▼
//!     [QuoteTick]                              [TCP Sockets]
//! ```

mod common;

use common::{ExampleConfig, QUOTE_TEMPLATE_ID, format_timestamp, init_logging};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use ferrofast_codec::{FastWriter, PresenceMapBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

const CHANNEL_CAPACITY: usize = 10_000;

/// Quote tick - the data structure passed through the SPSC channel.
#[derive(Debug, Clone)]
pub struct QuoteTick {
    pub seq_num: u64,
    pub symbol: &'static str,
    pub bid_cents: i64,
    pub ask_cents: i64,
    pub bid_size: u64,
    pub ask_size: u64,
}

/// Statistics for monitoring.
#[derive(Debug, Default)]
pub struct Stats {
    pub ticks_generated: AtomicU64,
    pub ticks_sent: AtomicU64,
    pub ticks_dropped: AtomicU64,
    pub clients_connected: AtomicU64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cfg = ExampleConfig::from_env();
    let addr = cfg.addr();
    info!("FAST feed server starting on {}", addr);

    // Create SPSC channel
    let (tx, rx): (Sender<QuoteTick>, Receiver<QuoteTick>) = bounded(CHANNEL_CAPACITY);

    // Shared state
    let running = Arc::new(AtomicBool::new(true));
    let stats = Arc::new(Stats::default());
    let clients: Arc<RwLock<HashMap<u64, tokio::sync::mpsc::Sender<Vec<u8>>>>> =
        Arc::new(RwLock::new(HashMap::new()));

    // Spawn tick generator thread (producer)
    let producer_running = Arc::clone(&running);
    let producer_stats = Arc::clone(&stats);
    let _producer_handle = thread::spawn(move || {
        quote_generator(tx, producer_running, producer_stats);
    });

    // Spawn consumer task that broadcasts to clients
    let consumer_rx = rx;
    let consumer_clients = Arc::clone(&clients);
    let consumer_stats = Arc::clone(&stats);
    let consumer_running = Arc::clone(&running);
    tokio::spawn(async move {
        quote_broadcaster(
            consumer_rx,
            consumer_clients,
            consumer_stats,
            consumer_running,
        )
        .await;
    });

    // Spawn stats reporter
    let stats_reporter = Arc::clone(&stats);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let generated = stats_reporter.ticks_generated.load(Ordering::Relaxed);
            let sent = stats_reporter.ticks_sent.load(Ordering::Relaxed);
            let dropped = stats_reporter.ticks_dropped.load(Ordering::Relaxed);
            let clients = stats_reporter.clients_connected.load(Ordering::Relaxed);
            info!(
                "Stats: generated={} sent={} dropped={} clients={}",
                generated, sent, dropped, clients
            );
        }
    });

    // Accept connections
    let listener: TcpListener = TcpListener::bind(&addr).await?;
    let mut client_id: u64 = 0;

    info!("FAST feed server listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        client_id += 1;
        info!("Client {} connected from {}", client_id, peer);

        let clients = Arc::clone(&clients);
        let stats = Arc::clone(&stats);
        let id = client_id;

        tokio::spawn(async move {
            handle_client(socket, id, clients, stats).await;
        });
    }
}

/// Quote generator - runs in a dedicated thread (producer).
fn quote_generator(tx: Sender<QuoteTick>, running: Arc<AtomicBool>, stats: Arc<Stats>) {
    info!("Quote generator started");

    let symbols: [&'static str; 5] = ["AAPL", "GOOGL", "MSFT", "AMZN", "META"];
    let mut prices: [i64; 5] = [15000, 14000, 38000, 17500, 50000]; // Prices in cents
    let mut seq_num: u64 = 0;

    while running.load(Ordering::Relaxed) {
        for (i, &symbol) in symbols.iter().enumerate() {
            seq_num += 1;

            // Simulate price movement (random walk)
            let delta = ((seq_num % 11) as i64 - 5) * 10; // -50 to +50 cents
            prices[i] = (prices[i] + delta).max(100);

            let tick = QuoteTick {
                seq_num,
                symbol,
                bid_cents: prices[i] - 5, // 5 cent spread
                ask_cents: prices[i] + 5,
                bid_size: 100 + (seq_num % 900),
                ask_size: 100 + ((seq_num + 50) % 900),
            };

            // Try to send without blocking (lock-free)
            match tx.try_send(tick) {
                Ok(()) => {
                    stats.ticks_generated.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Full(_)) => {
                    stats.ticks_dropped.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Disconnected(_)) => {
                    info!("Channel disconnected, stopping generator");
                    return;
                }
            }
        }

        // Generate ~50,000 ticks/second (5 symbols * 10,000 iterations)
        thread::sleep(Duration::from_micros(100));
    }

    info!("Quote generator stopped");
}

/// Quote broadcaster - consumes from the SPSC channel and fans out to clients.
async fn quote_broadcaster(
    rx: Receiver<QuoteTick>,
    clients: Arc<RwLock<HashMap<u64, tokio::sync::mpsc::Sender<Vec<u8>>>>>,
    stats: Arc<Stats>,
    running: Arc<AtomicBool>,
) {
    info!("Quote broadcaster started");

    while running.load(Ordering::Relaxed) {
        // Non-blocking receive with timeout
        match rx.recv_timeout(Duration::from_millis(10)) {
            Ok(tick) => {
                let frame = encode_quote(&tick);

                // Broadcast to all clients
                let clients_read = clients.read().await;
                for (client_id, tx) in clients_read.iter() {
                    if tx.try_send(frame.clone()).is_err() {
                        warn!("Client {} buffer full, dropping tick", client_id);
                    } else {
                        stats.ticks_sent.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // No data available, continue
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                info!("Channel disconnected, stopping broadcaster");
                break;
            }
        }
    }

    info!("Quote broadcaster stopped");
}

/// Handle a single client connection.
async fn handle_client(
    mut socket: TcpStream,
    client_id: u64,
    clients: Arc<RwLock<HashMap<u64, tokio::sync::mpsc::Sender<Vec<u8>>>>>,
    stats: Arc<Stats>,
) {
    // Create per-client channel for outgoing frames
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Vec<u8>>(1000);

    // Register client
    {
        let mut clients_write = clients.write().await;
        clients_write.insert(client_id, tx);
        stats.clients_connected.fetch_add(1, Ordering::Relaxed);
    }

    info!("Client {} registered", client_id);

    // Write loop - send quote frames to client
    loop {
        match rx.recv().await {
            Some(frame) => {
                if let Err(e) = socket.write_all(&frame).await {
                    error!("Client {} write error: {}", client_id, e);
                    break;
                }
            }
            None => {
                info!("Client {} channel closed", client_id);
                break;
            }
        }
    }

    // Cleanup
    {
        let mut clients_write = clients.write().await;
        clients_write.remove(&client_id);
        stats.clients_connected.fetch_sub(1, Ordering::Relaxed);
    }

    info!("Client {} disconnected", client_id);
}

/// Encode a quote tick as one FAST frame of the quote template.
///
/// The presence map carries only the template-id bit: the version field
/// is a mandatory constant and every other field uses no operator, so
/// their values follow in field order.
fn encode_quote(tick: &QuoteTick) -> Vec<u8> {
    let mut writer = FastWriter::new();

    writer.write_pmap(&PresenceMapBuilder::new().bit(true).build());
    writer.write_uint(u64::from(QUOTE_TEMPLATE_ID));

    // MsgSeqNum
    writer.write_uint(tick.seq_num);

    // SendingTime
    writer.write_string(&format_timestamp());

    // Symbol
    writer.write_string(tick.symbol);

    // BidPx as exponent + mantissa, cents on the wire
    writer.write_int(-2);
    writer.write_int(tick.bid_cents);

    // OfferPx
    writer.write_int(-2);
    writer.write_int(tick.ask_cents);

    // BidSize / OfferSize
    writer.write_uint(tick.bid_size);
    writer.write_uint(tick.ask_size);

    writer.finish()
}
