//! FAST feed client example.
//!
//! This example demonstrates a market data client that receives FAST
//! frames from a feed server and decodes them through a session holding
//! the shared quote template. Frames may arrive split across reads, so
//! the client buffers bytes and decodes every complete frame it has.

mod common;

use common::{ExampleConfig, init_logging, quote_template};
use ferrofast_codec::Cursor;
use ferrofast_core::{DecodeError, Message, Value};
use ferrofast_engine::{DecodeSession, FastEngine};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cfg = ExampleConfig::from_env();
    let addr = cfg.addr();
    info!("Connecting to FAST feed at {}", addr);

    let engine = FastEngine::builder()
        .add_template(quote_template())
        .build();
    let mut session = engine.session();

    let mut socket: TcpStream = TcpStream::connect(&addr).await?;
    info!("Connected to FAST feed");

    let mut buf = vec![0u8; 4096];
    let mut data = Vec::new();

    loop {
        match socket.read(&mut buf).await {
            Ok(0) => {
                info!("Feed closed connection");
                break;
            }
            Ok(n) => {
                data.extend_from_slice(&buf[..n]);
                drain_frames(&mut session, &mut data);
            }
            Err(e) => {
                error!("Read error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Decodes every complete frame in the buffer and keeps the partial tail.
fn drain_frames(session: &mut DecodeSession, data: &mut Vec<u8>) {
    while !data.is_empty() {
        let mut cursor = Cursor::new(data);
        match session.decode_from(&mut cursor) {
            Ok(message) => {
                print_quote(&message);
                let consumed = cursor.position();
                data.drain(..consumed);
            }
            Err(err) if err.root_cause() == &DecodeError::Underflow => {
                // Partial frame, wait for more bytes.
                return;
            }
            Err(err) => {
                error!("Decode error, dropping buffer: {}", err);
                data.clear();
                return;
            }
        }
    }
}

/// Logs one decoded quote message.
fn print_quote(message: &Message) {
    let seq = message.get(34).and_then(Value::as_u64).unwrap_or_default();
    let symbol = message.get(55).and_then(Value::as_str).unwrap_or("?");
    let bid = message.get(132).and_then(Value::to_decimal);
    let ask = message.get(133).and_then(Value::to_decimal);
    let bid_size = message.get(134).and_then(Value::as_u64).unwrap_or_default();
    let ask_size = message.get(135).and_then(Value::as_u64).unwrap_or_default();

    match (bid, ask) {
        (Some(bid), Some(ask)) => {
            info!(
                "Quote: seq={} {} {} x {} / {} x {}",
                seq, symbol, bid_size, bid, ask, ask_size
            );
        }
        _ => warn!("Quote without prices: seq={} {}", seq, symbol),
    }
}
