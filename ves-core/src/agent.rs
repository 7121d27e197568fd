//! Delivery Agent
//!
//! The single consumer of the ring buffer. It blocks on `read`, encodes each
//! event with the current throttle specification, posts it and drops it.
//! Delivery is at-most-once: a failed post is logged and the event discarded,
//! so producers never wait on a slow or absent collector.
//!
//! Closing the ring stops new posts but not delivery. Every event accepted
//! before the close is still sent before the agent exits.

use crate::encode::encode_event;
use crate::ring_buffer::RingBuffer;
use crate::throttle::{ThrottlePolicy, ThrottleStore};
use crate::transport::{Target, Transport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};
use ves_event::Event;

/// Handler metrics (atomic for lock-free access)
#[derive(Debug, Default)]
pub struct HandlerMetrics {
    pub(crate) events_posted: AtomicU64,
    pub(crate) events_dropped: AtomicU64,
    pub(crate) events_delivered: AtomicU64,
    pub(crate) delivery_failures: AtomicU64,
    pub(crate) throttle_reports: AtomicU64,
}

impl HandlerMetrics {
    pub fn snapshot(&self) -> HandlerMetricsSnapshot {
        HandlerMetricsSnapshot {
            events_posted: self.events_posted.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            throttle_reports: self.throttle_reports.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of handler metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerMetricsSnapshot {
    /// Events accepted into the buffer
    pub events_posted: u64,
    /// Events refused because the buffer was full
    pub events_dropped: u64,
    /// Events the collector accepted
    pub events_delivered: u64,
    /// Events lost to transport failures
    pub delivery_failures: u64,
    /// Throttling state reports sent
    pub throttle_reports: u64,
}

pub(crate) struct DeliveryAgent<T: Transport> {
    pub(crate) ring: Arc<RingBuffer<Event>>,
    pub(crate) transport: T,
    pub(crate) throttle: Arc<ThrottleStore>,
    pub(crate) metrics: Arc<HandlerMetrics>,
}

impl<T: Transport> DeliveryAgent<T> {
    /// Run until the ring buffer is closed and drained
    pub(crate) fn run(mut self) {
        let span = info_span!("delivery_agent");
        let _enter = span.enter();
        info!("Delivery agent started");

        let mut draining = false;
        while let Some(event) = self.ring.read() {
            if !draining && self.ring.is_closed() {
                draining = true;
                info!(remaining = self.ring.len() + 1, "Draining buffered events");
            }
            self.deliver(event);
        }

        info!("Delivery agent stopped");
    }

    fn deliver(&mut self, event: Event) {
        let domain = event.domain();
        let sequence = event.header().sequence;
        let policy: &dyn ThrottlePolicy = &*self.throttle;
        let body = encode_event(&event, Some(policy));
        drop(event);

        match self.transport.send(&body, Target::Events) {
            Ok(response) => {
                self.metrics.events_delivered.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %domain, sequence, "Event delivered");
                if let Some(response) = response {
                    self.apply_collector_response(&response);
                }
            }
            Err(e) => {
                self.metrics.delivery_failures.fetch_add(1, Ordering::Relaxed);
                error!(domain = %domain, sequence, error = %e, "Failed to deliver event");
            }
        }
    }

    fn apply_collector_response(&mut self, response: &str) {
        match self.throttle.handle_response(response) {
            Ok(Some(state)) => match self.transport.send(&state, Target::Throttling) {
                Ok(_) => {
                    self.metrics.throttle_reports.fetch_add(1, Ordering::Relaxed);
                    info!("Throttling state reported");
                }
                Err(e) => error!(error = %e, "Failed to report throttling state"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring collector response"),
        }
    }
}
