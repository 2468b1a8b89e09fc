//! FAST replay pipeline example with an SPSC lock-free channel.
//!
//! A producer thread encodes a synthetic trade stream frame by frame
//! and pushes the frames through a bounded SPSC channel; the consumer
//! decodes them with a single session. The stream leans on the
//! stateful operators: the sequence number increments on its own, the
//! symbol travels once and is copied afterwards, the price moves by
//! mantissa deltas, and the quantity is only encoded when it differs
//! from its default.

mod common;

use common::init_logging;
use crossbeam_channel::{Receiver, Sender, bounded};
use ferrofast_codec::{FastWriter, PresenceMapBuilder};
use ferrofast_core::{FieldProperties, Message, Value};
use ferrofast_engine::FastEngine;
use ferrofast_operator::Operator;
use ferrofast_template::{Template, TemplateBuilder};
use std::thread;
use tracing::info;

const TRADE_TEMPLATE_ID: u32 = 5;
const CHANNEL_CAPACITY: usize = 1024;
const FRAME_COUNT: u64 = 10;
const SYMBOL: &str = "ACME";
const DEFAULT_QTY: u32 = 100;

fn main() -> anyhow::Result<()> {
    init_logging();

    let (tx, rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = bounded(CHANNEL_CAPACITY);

    let producer = thread::spawn(move || {
        trade_producer(&tx);
    });

    let engine = FastEngine::builder().add_template(trade_template()).build();
    let mut session = engine.session();

    // The iterator ends when the producer drops its sender.
    let mut decoded = 0u64;
    for frame in rx {
        let message = session.decode(&frame)?;
        print_trade(&message);
        decoded += 1;
    }
    info!("Replay finished: {} frames decoded", decoded);

    info!(
        "Dictionary after replay: MsgSeqNum={:?} Symbol={:?} LastQty={:?}",
        session.dictionary().get("MsgSeqNum"),
        session.dictionary().get("Symbol"),
        session.dictionary().get("LastQty"),
    );

    session.reset();
    info!(
        "Dictionary after reset: MsgSeqNum={:?}",
        session.dictionary().get("MsgSeqNum"),
    );

    producer.join().ok();
    Ok(())
}

/// A trade template exercising one operator of each stateful kind.
fn trade_template() -> Template {
    TemplateBuilder::new(TRADE_TEMPLATE_ID, "IncrementalTrade")
        .uint32(
            FieldProperties::required(34, "MsgSeqNum"),
            Operator::Increment(Some(Value::UInt32(1))),
        )
        .ascii(FieldProperties::required(55, "Symbol"), Operator::Copy(None))
        .decimal(
            FieldProperties::required(31, "LastPx"),
            Operator::Constant(Value::Int32(-2)),
            Operator::Delta(None),
        )
        .uint32(
            FieldProperties::required(32, "LastQty"),
            Operator::Default(Some(Value::UInt32(DEFAULT_QTY))),
        )
        .build()
        .unwrap()
}

/// Encodes the synthetic trade stream (producer side).
fn trade_producer(tx: &Sender<Vec<u8>>) {
    info!("Trade producer started");

    let mut last_cents: i64 = 0;
    for i in 0..FRAME_COUNT {
        // Deterministic random walk around 15250.75, in cents.
        let cents = 1_525_075 + ((i as i64 % 7) - 3) * 25;
        let qty = if i % 3 == 0 {
            DEFAULT_QTY + (i as u32) * 50
        } else {
            DEFAULT_QTY
        };

        let frame = encode_trade(i == 0, cents - last_cents, qty);
        last_cents = cents;

        if tx.send(frame).is_err() {
            info!("Channel disconnected, stopping producer");
            return;
        }
    }

    info!("Trade producer finished after {} frames", FRAME_COUNT);
}

/// Encode one trade frame of the trade template.
///
/// Presence bits per frame: template id, MsgSeqNum, Symbol, LastQty.
/// The price exponent is a mandatory constant and the mantissa is a
/// delta, so neither ever takes a bit. The sequence number is never on
/// the wire here; the increment operator derives it.
fn encode_trade(first: bool, delta_cents: i64, qty: u32) -> Vec<u8> {
    let qty_on_wire = qty != DEFAULT_QTY;

    let mut writer = FastWriter::new();
    writer.write_pmap(
        &PresenceMapBuilder::new()
            .bit(true)
            .bit(false)
            .bit(first)
            .bit(qty_on_wire)
            .build(),
    );
    writer.write_uint(u64::from(TRADE_TEMPLATE_ID));
    if first {
        writer.write_string(SYMBOL);
    }
    writer.write_int(delta_cents);
    if qty_on_wire {
        writer.write_uint(u64::from(qty));
    }
    writer.finish()
}

/// Logs one decoded trade message.
fn print_trade(message: &Message) {
    let seq = message.get(34).and_then(Value::as_u32).unwrap_or_default();
    let symbol = message.get(55).and_then(Value::as_str).unwrap_or("?");
    let price = message.get(31).and_then(Value::to_decimal);
    let qty = message.get(32).and_then(Value::as_u32).unwrap_or_default();

    match price {
        Some(price) => info!("Trade: seq={} {} {} @ {}", seq, symbol, qty, price),
        None => info!("Trade: seq={} {} {} @ ?", seq, symbol, qty),
    }
}
