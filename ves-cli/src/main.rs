//! VES Reporter
//!
//! Command-line front end for the VES event handler: sends heartbeats to a
//! collector, raises one-off faults and prints sample event encodings.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use ves_core::{encode_event, HandlerConfig, PostError};
use ves_event::{
    AlertAction, AlertType, Criticality, EntityState, Event, Fault, HeartbeatField, JsonObject,
    JsonObjectInstance, Other, PerfCounter, Priority, ReportingEntity, Report, Severity,
    SourceType, StateChange, Syslog, SyslogFacility, ThresholdCross, VfStatus,
};

#[derive(Parser)]
#[command(name = "ves-reporter")]
#[command(about = "VES event reporter - buffers and delivers events to a VES collector", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level or filter directive
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CollectorArgs {
    /// Handler configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Collector host
    #[arg(long)]
    fqdn: Option<String>,

    /// Collector port
    #[arg(long)]
    port: Option<u16>,

    /// Basic authentication user
    #[arg(long)]
    username: Option<String>,

    /// Basic authentication password
    #[arg(long, env = "VES_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Use HTTPS
    #[arg(long)]
    secure: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send heartbeats until interrupted
    Run {
        #[command(flatten)]
        collector: CollectorArgs,

        /// Seconds between heartbeats
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Raise a single fault and exit once it has been delivered
    Fault {
        #[command(flatten)]
        collector: CollectorArgs,

        /// Alarm condition
        #[arg(long)]
        condition: String,

        /// Specific problem
        #[arg(long)]
        problem: String,

        /// Severity (CRITICAL, MAJOR, MINOR, WARNING, NORMAL)
        #[arg(long, default_value = "MAJOR")]
        severity: Severity,

        /// Priority (High, Medium, Normal, Low)
        #[arg(long, default_value = "Normal")]
        priority: Priority,

        /// Additional information as name=value
        #[arg(long = "info", value_parser = parse_name_value)]
        info: Vec<(String, String)>,
    },

    /// Print the JSON encoding of a sample event
    Encode {
        /// Event domain to encode
        #[arg(value_enum)]
        domain: SampleDomain,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a configuration file and print the collector URLs
    Validate {
        /// Handler configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleDomain {
    Heartbeat,
    HeartbeatField,
    Fault,
    Measurement,
    StateChange,
    Syslog,
    Other,
    ThresholdCrossingAlert,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run {
            collector,
            interval,
        } => {
            let mut config = load_config(&collector)?;
            if let Some(interval) = interval {
                config.heartbeat_interval_secs = interval;
            }
            run_reporter(config)?;
        }
        Commands::Fault {
            collector,
            condition,
            problem,
            severity,
            priority,
            info,
        } => {
            let config = load_config(&collector)?;
            raise_fault(config, &condition, &problem, severity, priority, info)?;
        }
        Commands::Encode { domain, pretty } => {
            let event = sample_event(domain, &ReportingEntity::new("ves-reporter", "ves-reporter"));
            let json = encode_event(&event, None);
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&json)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", json);
            }
        }
        Commands::Validate { config } => {
            let loaded = HandlerConfig::from_yaml_file(&config)
                .with_context(|| format!("Invalid configuration {}", config.display()))?;
            println!("events:     {}", loaded.collector.events_url());
            println!("throttling: {}", loaded.collector.throttling_url());
            println!("capacity:   {}", loaded.buffer_capacity);
        }
    }

    Ok(())
}

fn setup_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

fn parse_name_value(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))
}

fn load_config(args: &CollectorArgs) -> Result<HandlerConfig> {
    let mut config = match &args.config {
        Some(path) => HandlerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => HandlerConfig::default(),
    };

    if let Some(fqdn) = &args.fqdn {
        config.collector.fqdn = fqdn.clone();
    }
    if let Some(port) = args.port {
        config.collector.port = port;
    }
    if let Some(username) = &args.username {
        config.collector.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.collector.password = password.clone();
    }
    if args.secure {
        config.collector.secure = true;
    }

    config.validate()?;
    Ok(config)
}

fn run_reporter(config: HandlerConfig) -> Result<()> {
    // The blocking HTTP client must be created and dropped outside the runtime.
    let handler = ves_core::connect(&config)?;
    let handle = handler.handle();
    let mut period = config.heartbeat_interval_secs.max(1);

    info!(interval = period, "Reporter running. Press Ctrl+C to stop.");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_secs(period));
        loop {
            let interrupted = tokio::select! {
                _ = ticker.tick() => false,
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    true
                }
            };
            if interrupted {
                break;
            }

            let heartbeat = HeartbeatField::new(
                handle.reporting_entity(),
                "Heartbeat_vReporter",
                "heartbeat",
                period as i64,
            );
            match handle.post_event(heartbeat) {
                Ok(()) => {}
                Err(PostError::BufferFull) => warn!("Heartbeat dropped, buffer full"),
                Err(PostError::HandlerInactive) => break,
            }

            if let Some(requested) = handle.throttle().measurement_interval() {
                if requested != period {
                    info!(interval = requested, "Adopting collector measurement interval");
                    period = requested;
                    ticker = tokio::time::interval(Duration::from_secs(period));
                    ticker.tick().await;
                }
            }
        }
    });
    drop(runtime);

    info!("Shutting down reporter");
    let metrics = handler.shutdown();
    info!(
        posted = metrics.events_posted,
        delivered = metrics.events_delivered,
        failed = metrics.delivery_failures,
        dropped = metrics.events_dropped,
        "Reporter stopped"
    );

    Ok(())
}

fn raise_fault(
    config: HandlerConfig,
    condition: &str,
    problem: &str,
    severity: Severity,
    priority: Priority,
    info: Vec<(String, String)>,
) -> Result<()> {
    let handler = ves_core::connect(&config)?;
    let handle = handler.handle();

    let mut fault = Fault::new(
        handle.reporting_entity(),
        format!("Fault_{}", config.source.source_name),
        "fault0001",
        condition,
        problem,
        priority,
        severity,
        SourceType::VirtualMachine,
        VfStatus::Active,
    );
    for (name, value) in info {
        fault.add_additional_info(name, value);
    }

    handle.post_event(fault)?;
    let metrics = handler.shutdown();

    if metrics.events_delivered != 1 {
        anyhow::bail!("Fault was not delivered to {}", config.collector.events_url());
    }
    info!("Fault delivered");
    Ok(())
}

fn sample_event(domain: SampleDomain, entity: &ReportingEntity) -> Event {
    match domain {
        SampleDomain::Heartbeat => Event::heartbeat(entity),
        SampleDomain::HeartbeatField => {
            let mut event = HeartbeatField::new(entity, "Heartbeat_vReporter", "hb0001", 60);
            event.add_additional_field("uptime", "3600");
            event.into()
        }
        SampleDomain::Fault => {
            let mut event = Fault::new(
                entity,
                "Fault_vReporter_linkDown",
                "fault0001",
                "linkDown",
                "eth0 link down",
                Priority::High,
                Severity::Major,
                SourceType::VirtualMachine,
                VfStatus::Active,
            );
            event.set_category("link");
            event.set_interface("eth0");
            event.add_additional_info("cause", "carrier lost");
            event.into()
        }
        SampleDomain::Measurement => {
            let mut event = Report::new(entity, "Measurement_vReporter", "mr0001", 60.0);
            event.add_feature_usage("sessions", 12);
            event.add_custom_measurement("cpu", "user", "12.5");
            event.add_custom_measurement("cpu", "system", "3.1");
            event.into()
        }
        SampleDomain::StateChange => {
            let mut event = StateChange::new(
                entity,
                "StateChange_vReporter",
                "sc0001",
                EntityState::OutOfService,
                EntityState::InService,
                "eth0",
            );
            event.add_field("reason", "maintenance window");
            event.into()
        }
        SampleDomain::Syslog => {
            let mut event = Syslog::new(
                entity,
                "Syslog_vReporter",
                "sl0001",
                SourceType::VirtualMachine,
                "link eth0 down",
                "kernel",
            );
            event.set_facility(SyslogFacility::Kernel);
            event.set_proc("kworker");
            event.into()
        }
        SampleDomain::Other => {
            let mut event = Other::new(entity, "Other_vReporter", "ot0001");
            event.add_name_value("build", "1.0.0");
            event.add_named_array_entry("interfaces", "eth0", "up");
            let mut object = JsonObject::new("routes");
            object.add_instance(JsonObjectInstance::new(r#"{"dest":"0.0.0.0/0"}"#));
            event.add_json_object(object);
            event.into()
        }
        SampleDomain::ThresholdCrossingAlert => {
            let now = ves_event::now_epoch_microsec();
            let counter = PerfCounter {
                criticality: Criticality::Major,
                name: "cpuUsage".to_string(),
                threshold_crossed: "80".to_string(),
                value: "93".to_string(),
            };
            let mut event = ThresholdCross::new(
                entity,
                "TCA_vReporter",
                "tca0001",
                counter,
                AlertAction::Set,
                "CPU above threshold",
                AlertType::ElementAnomaly,
                now,
                Severity::Major,
                now,
            );
            event.add_alert_id("cpu-high");
            event.into()
        }
    }
}
