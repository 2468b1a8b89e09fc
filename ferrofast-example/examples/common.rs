//! Common utilities shared across examples.

#![allow(dead_code)]

use ferrofast_core::{FieldProperties, Value};
use ferrofast_operator::Operator;
use ferrofast_template::{Template, TemplateBuilder};
use std::env;

/// Default feed port.
pub const DEFAULT_PORT: u16 = 9890;

/// Default feed host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Template id shared by the feed server and its clients.
pub const QUOTE_TEMPLATE_ID: u32 = 2;

/// Example configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    /// Feed hostname.
    pub host: String,
    /// Feed port.
    pub port: u16,
}

impl ExampleConfig {
    /// Loads the configuration from `FAST_HOST` / `FAST_PORT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("FAST_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("FAST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Returns the socket address string.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Format the current UTC time of day for feed display.
#[must_use]
pub fn format_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let d = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    let (s, ms) = (d.as_secs(), d.subsec_millis());
    let tod = s % 86400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60,
        ms
    )
}

/// The quote template both sides of the feed agree on.
///
/// Prices travel as decimals with an explicit exponent, so the server
/// encodes cents and clients recover the scaled value without any float
/// arithmetic on the wire.
#[must_use]
pub fn quote_template() -> Template {
    TemplateBuilder::new(QUOTE_TEMPLATE_ID, "Quote")
        .ascii(
            FieldProperties::required(1128, "ApplVerID"),
            Operator::Constant(Value::from("9")),
        )
        .uint64(FieldProperties::required(34, "MsgSeqNum"), Operator::None)
        .ascii(FieldProperties::required(52, "SendingTime"), Operator::None)
        .ascii(FieldProperties::required(55, "Symbol"), Operator::None)
        .decimal(
            FieldProperties::required(132, "BidPx"),
            Operator::None,
            Operator::None,
        )
        .decimal(
            FieldProperties::required(133, "OfferPx"),
            Operator::None,
            Operator::None,
        )
        .uint64(FieldProperties::required(134, "BidSize"), Operator::None)
        .uint64(FieldProperties::required(135, "OfferSize"), Operator::None)
        .build()
        .unwrap()
}
