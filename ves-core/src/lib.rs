//! VES Core
//!
//! Buffering and delivery of VES events: a bounded ring buffer between
//! producers and a single delivery agent, the throttle-aware JSON encoder and
//! the collector transport.

pub mod agent;
pub mod config;
pub mod encode;
pub mod handler;
pub mod json;
pub mod ring_buffer;
pub mod throttle;
pub mod transport;

use std::sync::Arc;

pub use agent::{HandlerMetrics, HandlerMetricsSnapshot};
pub use config::{CollectorConfig, ConfigError, HandlerConfig, SourceConfig};
pub use encode::encode_event;
pub use handler::{EventHandle, EventHandler, HandlerError, PostError};
pub use json::{Checkpoint, JsonWriter};
pub use ring_buffer::{RingBuffer, RingBufferError, WriteError};
pub use throttle::{DomainThrottleSpec, NoThrottle, ThrottleError, ThrottlePolicy, ThrottleStore};
pub use transport::{HttpTransport, Target, Transport, TransportError};

/// Start an event handler posting to the configured collector over HTTP
pub fn connect(config: &HandlerConfig) -> Result<EventHandler, HandlerError> {
    config.validate()?;
    let transport = HttpTransport::new(&config.collector)?;
    EventHandler::start(config, transport, Arc::new(ThrottleStore::new()))
}
