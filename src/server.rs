//! Service runtime
//!
//! [`AppContext`] wires storage, the event bus, the default handlers, the
//! dispatcher and the services. [`ServerHandle`] runs it behind the REST
//! API and owns graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{
    register_default_handlers, ActivityLog, BlockService, DispatchMode, EventBus,
    EventDispatcher, GymService, HandlerDependencies, SharedEventBus, SharedEventDispatcher,
    TweetService, UserService,
};
use crate::config::{AppConfig, EventsConfig};
use crate::infrastructure::{InMemoryStorage, ShutdownCoordinator, ShutdownSignal};
use crate::interfaces::http::{create_api_router, ApiServices};

/// Fully wired application, independent of any listener
pub struct AppContext {
    pub storage: Arc<InMemoryStorage>,
    pub bus: SharedEventBus,
    pub dispatcher: SharedEventDispatcher,
    pub activity: Arc<ActivityLog>,
    pub users: Arc<UserService>,
    pub tweets: Arc<TweetService>,
    pub blocks: Arc<BlockService>,
    pub gyms: Arc<GymService>,
    /// Present in queued mode; finishes after `shutdown` fires and the
    /// queue is drained.
    pub event_worker: Option<JoinHandle<()>>,
    started_at: Arc<Instant>,
}

impl AppContext {
    /// Build the object graph. Queued mode spawns the event worker, so this
    /// must run inside a tokio runtime.
    pub fn build(events: &EventsConfig, shutdown: ShutdownSignal) -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        let activity = Arc::new(ActivityLog::new(events.activity_log_capacity));

        // Handlers are registered before the bus is shared with anything.
        let bus = EventBus::new();
        register_default_handlers(
            &bus,
            HandlerDependencies {
                users: storage.clone(),
                tweets: storage.clone(),
                blocks: storage.clone(),
                activity: Arc::clone(&activity),
            },
        );
        let bus: SharedEventBus = Arc::new(bus);

        let (dispatcher, event_worker) = match events.dispatch_mode {
            DispatchMode::Inline => (EventDispatcher::inline(Arc::clone(&bus)), None),
            DispatchMode::Queued => {
                let (dispatcher, worker) =
                    EventDispatcher::queued(Arc::clone(&bus), events.queue_capacity, shutdown);
                (dispatcher, Some(worker))
            }
        };
        let dispatcher = Arc::new(dispatcher);
        info!(mode = ?events.dispatch_mode, "Event dispatcher ready");

        let users = Arc::new(UserService::new(
            storage.clone(),
            storage.clone(),
            Arc::clone(&dispatcher),
        ));
        let tweets = Arc::new(TweetService::new(
            storage.clone(),
            storage.clone(),
            storage.clone(),
            storage.clone(),
            Arc::clone(&dispatcher),
        ));
        let blocks = Arc::new(BlockService::new(
            storage.clone(),
            storage.clone(),
            Arc::clone(&dispatcher),
        ));
        let gyms = Arc::new(GymService::new(storage.clone(), Arc::clone(&dispatcher)));

        Self {
            storage,
            bus,
            dispatcher,
            activity,
            users,
            tweets,
            blocks,
            gyms,
            event_worker,
            started_at: Arc::new(Instant::now()),
        }
    }

    pub fn api_services(&self) -> ApiServices {
        ApiServices {
            users: Arc::clone(&self.users),
            tweets: Arc::clone(&self.tweets),
            blocks: Arc::clone(&self.blocks),
            gyms: Arc::clone(&self.gyms),
            dispatcher: Arc::clone(&self.dispatcher),
            activity: Arc::clone(&self.activity),
            started_at: Arc::clone(&self.started_at),
        }
    }
}

/// Options for starting the service.
#[derive(Default)]
pub struct ServerOptions {
    pub config: AppConfig,
    /// Mount `/metrics` and install the global Prometheus recorder.
    pub enable_metrics: bool,
}

/// Handle to a running service.
pub struct ServerHandle {
    pub config: AppConfig,
    pub bus: SharedEventBus,
    /// Port actually bound, which differs from the configured one when
    /// the configuration asked for port 0.
    pub port: u16,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    event_worker: Option<JoinHandle<()>>,
}

/// The global recorder can only be installed once per process.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, std::io::Error> {
        let config = opts.config;
        info!("Starting crux service");

        let metrics = if opts.enable_metrics {
            prometheus_handle()
        } else {
            None
        };

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let mut context = AppContext::build(&config.events, shutdown.signal());
        let router = create_api_router(context.api_services(), metrics);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local = listener.local_addr()?;
        info!(address = %local, "REST API listening");
        info!("Swagger UI available at http://{}/docs/", local);

        let api_shutdown = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = served.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            bus: Arc::clone(&context.bus),
            event_worker: context.event_worker.take(),
            port: local.port(),
            config,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM / SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait until shutdown is triggered, then for the API and the event
    /// worker to stop within the configured timeout.
    pub async fn wait(self) {
        let signal = self.shutdown.signal();
        signal.wait().await;

        let api_task = self.api_task;
        let event_worker = self.event_worker;
        let completed = self
            .shutdown
            .run_cleanup(async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API task panicked");
                }
                if let Some(worker) = event_worker {
                    if let Err(e) = worker.await {
                        error!(error = %e, "Event worker panicked");
                    }
                }
            })
            .await;

        if !completed {
            warn!("Some tasks did not stop before the shutdown timeout");
        }
        info!("crux service stopped");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.shutdown.signal().trigger();
        self.wait().await;
    }
}

/// Initialise tracing from the logging config. Call once at startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
