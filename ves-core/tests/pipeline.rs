use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use ves_core::{
    EventHandler, HandlerConfig, PostError, Target, ThrottleStore, Transport, TransportError,
};
use ves_event::{Event, Fault, Priority, ReportingEntity, Severity, SourceType, VfStatus};

enum Reply {
    Body(&'static str),
    Fail(u16),
}

/// Records every post and answers from a script, then with empty bodies
#[derive(Clone, Default)]
struct MockCollector {
    sent: Arc<Mutex<Vec<(String, Target)>>>,
    script: Arc<Mutex<VecDeque<Reply>>>,
}

impl MockCollector {
    fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into())),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<(String, Target)> {
        self.sent.lock().clone()
    }
}

impl Transport for MockCollector {
    fn send(&mut self, body: &str, target: Target) -> Result<Option<String>, TransportError> {
        self.sent.lock().push((body.to_string(), target));
        match self.script.lock().pop_front() {
            Some(Reply::Body(body)) => Ok(Some(body.to_string())),
            Some(Reply::Fail(status)) => Err(TransportError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(None),
        }
    }
}

/// Holds the agent inside its first `send` until the test releases it
struct GatedCollector {
    inner: MockCollector,
    entered: mpsc::Sender<()>,
    gate: mpsc::Receiver<()>,
    first: bool,
}

impl Transport for GatedCollector {
    fn send(&mut self, body: &str, target: Target) -> Result<Option<String>, TransportError> {
        if self.first {
            self.first = false;
            let _ = self.entered.send(());
            let _ = self.gate.recv();
        }
        self.inner.send(body, target)
    }
}

fn gated() -> (GatedCollector, MockCollector, mpsc::Receiver<()>, mpsc::Sender<()>) {
    let inner = MockCollector::default();
    let (entered_tx, entered_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel();
    let transport = GatedCollector {
        inner: inner.clone(),
        entered: entered_tx,
        gate: gate_rx,
        first: true,
    };
    (transport, inner, entered_rx, gate_tx)
}

fn config(capacity: usize) -> HandlerConfig {
    HandlerConfig {
        buffer_capacity: capacity,
        ..Default::default()
    }
}

fn fault(entity: &ReportingEntity, id: &str) -> Fault {
    let mut fault = Fault::new(
        entity,
        "Fault_vm_linkDown",
        id,
        "linkDown",
        "eth0 down",
        Priority::High,
        Severity::Major,
        SourceType::VirtualMachine,
        VfStatus::Active,
    );
    fault.set_category("link");
    fault.add_additional_info("cause", "cable");
    fault.add_additional_info("port", "eth0");
    fault
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_events_delivered_in_post_order() {
    let collector = MockCollector::default();
    let handler = EventHandler::start(
        &config(16),
        collector.clone(),
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();
    let handle = handler.handle();

    for i in 0..10 {
        handle
            .post_event(fault(handle.reporting_entity(), &format!("f{}", i)))
            .unwrap();
    }

    let metrics = handler.shutdown();
    assert_eq!(metrics.events_posted, 10);
    assert_eq!(metrics.events_delivered, 10);

    let sent = collector.sent();
    assert_eq!(sent.len(), 10);
    for (i, (body, target)) in sent.iter().enumerate() {
        assert_eq!(*target, Target::Events);
        let header = &parse(body)["event"]["commonEventHeader"];
        assert_eq!(header["eventId"], format!("f{}", i));
        assert_eq!(header["sequence"], (i + 1) as u64);
    }
}

#[test]
fn test_producers_on_many_threads() {
    let collector = MockCollector::default();
    let handler = EventHandler::start(
        &config(256),
        collector.clone(),
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handler.handle();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    handle
                        .post_event(Event::heartbeat(handle.reporting_entity()))
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let metrics = handler.shutdown();
    assert_eq!(metrics.events_delivered, 100);

    let mut sequences: Vec<u64> = collector
        .sent()
        .iter()
        .map(|(body, _)| {
            parse(body)["event"]["commonEventHeader"]["sequence"]
                .as_u64()
                .unwrap()
        })
        .collect();
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=100).collect::<Vec<u64>>());
}

#[test]
fn test_failed_post_does_not_stop_delivery() {
    let collector = MockCollector::scripted(vec![Reply::Fail(503)]);
    let handler = EventHandler::start(
        &config(8),
        collector.clone(),
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();
    let handle = handler.handle();

    handle.post_event(fault(handle.reporting_entity(), "lost")).unwrap();
    handle.post_event(fault(handle.reporting_entity(), "kept")).unwrap();

    let metrics = handler.shutdown();
    assert_eq!(metrics.delivery_failures, 1);
    assert_eq!(metrics.events_delivered, 1);
    assert_eq!(collector.sent().len(), 2);
}

#[test]
fn test_collector_throttling_commands() {
    let commands = r#"{
        "commandList": [
            {"command": {
                "commandType": "throttlingSpecification",
                "eventDomainThrottleSpecification": {
                    "eventDomain": "fault",
                    "suppressedFieldNames": ["eventCategory"],
                    "suppressedNvPairsList": [
                        {"nvPairFieldName": "alarmAdditionalInformation",
                         "suppressedNvPairNames": ["cause"]}
                    ]
                }
            }},
            {"command": {"commandType": "measurementIntervalChange", "measurementInterval": 60}},
            {"command": {"commandType": "provideThrottlingState"}}
        ]
    }"#;

    let collector = MockCollector::scripted(vec![Reply::Body(commands)]);
    let throttle = Arc::new(ThrottleStore::new());
    let handler =
        EventHandler::start(&config(8), collector.clone(), Arc::clone(&throttle)).unwrap();
    let handle = handler.handle();

    handle.post_event(fault(handle.reporting_entity(), "f1")).unwrap();
    handle.post_event(fault(handle.reporting_entity(), "f2")).unwrap();

    let metrics = handler.shutdown();
    assert_eq!(metrics.events_delivered, 2);
    assert_eq!(metrics.throttle_reports, 1);
    assert_eq!(throttle.measurement_interval(), Some(60));

    let sent = collector.sent();
    assert_eq!(sent.len(), 3);

    let first = parse(&sent[0].0);
    let fields = &first["event"]["faultFields"];
    assert_eq!(fields["eventCategory"], "link");
    assert_eq!(fields["alarmAdditionalInformation"][0]["name"], "cause");

    assert_eq!(sent[1].1, Target::Throttling);
    let state = parse(&sent[1].0);
    let state = &state["eventThrottlingState"];
    assert_eq!(state["eventThrottlingMode"], "throttled");
    let spec = &state["eventDomainThrottleSpecificationList"][0];
    assert_eq!(spec["eventDomain"], "fault");
    assert_eq!(spec["suppressedFieldNames"][0], "eventCategory");

    assert_eq!(sent[2].1, Target::Events);
    let second = parse(&sent[2].0);
    let fields = &second["event"]["faultFields"];
    assert!(fields.get("eventCategory").is_none());
    let info = fields["alarmAdditionalInformation"].as_array().unwrap();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0]["name"], "port");
    assert_eq!(fields["alarmCondition"], "linkDown");
}

#[test]
fn test_unparseable_response_is_ignored() {
    let collector = MockCollector::scripted(vec![Reply::Body("<html>ok</html>")]);
    let throttle = Arc::new(ThrottleStore::new());
    let handler =
        EventHandler::start(&config(8), collector.clone(), Arc::clone(&throttle)).unwrap();
    let handle = handler.handle();

    handle.post_event(fault(handle.reporting_entity(), "f1")).unwrap();
    handle.post_event(fault(handle.reporting_entity(), "f2")).unwrap();

    let metrics = handler.shutdown();
    assert_eq!(metrics.events_delivered, 2);
    assert_eq!(metrics.throttle_reports, 0);
    assert!(!throttle.is_throttled());
}

#[test]
fn test_full_buffer_drops_new_events() {
    let (transport, collector, entered, gate) = gated();
    let handler = EventHandler::start(
        &config(3),
        transport,
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();
    let handle = handler.handle();
    let entity = handle.reporting_entity();

    handle.post_event(fault(entity, "in-flight")).unwrap();
    entered.recv_timeout(Duration::from_secs(5)).unwrap();

    handle.post_event(fault(entity, "b1")).unwrap();
    handle.post_event(fault(entity, "b2")).unwrap();
    assert_eq!(
        handle.post_event(fault(entity, "dropped")),
        Err(PostError::BufferFull)
    );

    gate.send(()).unwrap();
    let metrics = handler.shutdown();
    assert_eq!(metrics.events_posted, 3);
    assert_eq!(metrics.events_dropped, 1);
    assert_eq!(metrics.events_delivered, 3);

    let ids: Vec<String> = collector
        .sent()
        .iter()
        .map(|(body, _)| {
            parse(body)["event"]["commonEventHeader"]["eventId"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(ids, ["in-flight", "b1", "b2"]);
}

#[test]
fn test_shutdown_delivers_backlog_and_refuses_late_posts() {
    let (transport, collector, entered, gate) = gated();
    let handler = EventHandler::start(
        &HandlerConfig::default(),
        transport,
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();
    let handle = handler.handle();

    handle.post_event(fault(handle.reporting_entity(), "in-flight")).unwrap();
    entered.recv_timeout(Duration::from_secs(5)).unwrap();
    handle.post_event(fault(handle.reporting_entity(), "b1")).unwrap();
    handle.post_event(fault(handle.reporting_entity(), "b2")).unwrap();

    let stopper = std::thread::spawn(move || handler.shutdown());
    while handle.is_active() {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(
        handle.post_event(fault(handle.reporting_entity(), "late")),
        Err(PostError::HandlerInactive)
    );

    gate.send(()).unwrap();
    let metrics = stopper.join().unwrap();
    assert_eq!(metrics.events_posted, 3);
    assert_eq!(metrics.events_delivered, 3);

    let ids: Vec<String> = collector
        .sent()
        .iter()
        .map(|(body, _)| {
            parse(body)["event"]["commonEventHeader"]["eventId"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(ids, ["in-flight", "b1", "b2"]);
}

/// Adds a fixed delay to every post
struct SlowCollector {
    inner: MockCollector,
    delay: Duration,
}

impl Transport for SlowCollector {
    fn send(&mut self, body: &str, target: Target) -> Result<Option<String>, TransportError> {
        std::thread::sleep(self.delay);
        self.inner.send(body, target)
    }
}

#[test]
fn test_immediate_shutdown_delivers_every_accepted_event() {
    let collector = MockCollector::default();
    let transport = SlowCollector {
        inner: collector.clone(),
        delay: Duration::from_millis(20),
    };
    let handler = EventHandler::start(
        &HandlerConfig::default(),
        transport,
        Arc::new(ThrottleStore::new()),
    )
    .unwrap();
    let handle = handler.handle();

    for _ in 0..5 {
        handle
            .post_event(Event::heartbeat(handle.reporting_entity()))
            .unwrap();
    }
    let metrics = handler.shutdown();

    assert_eq!(metrics.events_posted, 5);
    assert_eq!(metrics.events_delivered, 5);
    assert_eq!(collector.sent().len(), 5);
}

#[test]
fn test_connect_rejects_invalid_config() {
    let config = HandlerConfig {
        buffer_capacity: 0,
        ..Default::default()
    };
    assert!(ves_core::connect(&config).is_err());
}
