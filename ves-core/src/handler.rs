//! Event Handler
//!
//! The producer-facing side of the pipeline. [`EventHandler::start`] creates
//! the ring buffer and spawns the delivery agent thread; cloned
//! [`EventHandle`]s post events from any thread without blocking.

use crate::agent::{DeliveryAgent, HandlerMetrics, HandlerMetricsSnapshot};
use crate::config::{ConfigError, HandlerConfig};
use crate::ring_buffer::{RingBuffer, RingBufferError, WriteError};
use crate::throttle::ThrottleStore;
use crate::transport::{Transport, TransportError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, info, warn};
use ves_event::{Event, ReportingEntity};

/// Error starting the handler
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Ring buffer error: {0}")]
    RingBuffer(#[from] RingBufferError),

    #[error("Failed to spawn delivery agent: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Error posting an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("Event buffer is full, event dropped")]
    BufferFull,

    #[error("Event handler is not active")]
    HandlerInactive,
}

/// Handle for posting events to the handler
#[derive(Clone)]
pub struct EventHandle {
    ring: Arc<RingBuffer<Event>>,
    metrics: Arc<HandlerMetrics>,
    entity: Arc<ReportingEntity>,
    throttle: Arc<ThrottleStore>,
}

impl EventHandle {
    /// Queue an event for delivery without blocking.
    ///
    /// The event is dropped if the buffer is full. Delivery failures are
    /// never reported here.
    pub fn post_event(&self, event: impl Into<Event>) -> Result<(), PostError> {
        match self.ring.write(event.into()) {
            Ok(()) => {
                self.metrics.events_posted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(WriteError::Full(event)) => {
                self.metrics.events_dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    domain = %event.domain(),
                    sequence = event.header().sequence,
                    "Event buffer full, dropping event"
                );
                Err(PostError::BufferFull)
            }
            Err(WriteError::Closed(_)) => Err(PostError::HandlerInactive),
        }
    }

    /// Identity and sequence counter used to mint event headers
    pub fn reporting_entity(&self) -> &ReportingEntity {
        &self.entity
    }

    /// Throttle state learned from the collector
    pub fn throttle(&self) -> &ThrottleStore {
        &self.throttle
    }

    pub fn is_active(&self) -> bool {
        !self.ring.is_closed()
    }

    /// Events currently buffered
    pub fn buffered(&self) -> usize {
        self.ring.len()
    }

    pub fn metrics(&self) -> HandlerMetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Owns the delivery agent thread
pub struct EventHandler {
    handle: EventHandle,
    agent: Option<JoinHandle<()>>,
}

impl EventHandler {
    /// Create the ring buffer and start the delivery agent
    pub fn start<T>(
        config: &HandlerConfig,
        transport: T,
        throttle: Arc<ThrottleStore>,
    ) -> Result<Self, HandlerError>
    where
        T: Transport + 'static,
    {
        config.validate()?;

        let ring = Arc::new(RingBuffer::new(config.buffer_capacity)?);
        let metrics = Arc::new(HandlerMetrics::default());

        let agent = DeliveryAgent {
            ring: Arc::clone(&ring),
            transport,
            throttle: Arc::clone(&throttle),
            metrics: Arc::clone(&metrics),
        };

        let join = std::thread::Builder::new()
            .name("ves-delivery".to_string())
            .spawn(move || agent.run())
            .map_err(HandlerError::Spawn)?;

        info!(
            capacity = config.buffer_capacity,
            source = %config.source.source_name,
            "Event handler started"
        );

        Ok(Self {
            handle: EventHandle {
                ring,
                metrics,
                entity: Arc::new(config.source.reporting_entity()),
                throttle,
            },
            agent: Some(join),
        })
    }

    /// Get a handle for posting events
    pub fn handle(&self) -> EventHandle {
        self.handle.clone()
    }

    /// Post an event through the handler's own handle
    pub fn post_event(&self, event: impl Into<Event>) -> Result<(), PostError> {
        self.handle.post_event(event)
    }

    pub fn metrics(&self) -> HandlerMetricsSnapshot {
        self.handle.metrics()
    }

    /// Stop accepting events and wait for the agent to deliver everything
    /// already accepted. Returns the final metrics.
    pub fn shutdown(mut self) -> HandlerMetricsSnapshot {
        self.stop();
        self.handle.metrics()
    }

    fn stop(&mut self) {
        let Some(agent) = self.agent.take() else {
            return;
        };

        info!(buffered = self.handle.buffered(), "Event handler terminating");
        self.handle.ring.close();
        if agent.join().is_err() {
            error!("Delivery agent panicked");
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop();
    }
}
