//! Startup orchestration.
//!
//! # Order
//! 1. Logging and metrics (configuration already loaded by the caller)
//! 2. Node connection for the selected network (fatal on failure)
//! 3. Listener bind (fatal on failure)
//! 4. Serve until SIGINT/SIGTERM
//!
//! Traffic is accepted only once the node connection is up.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::blockchain::{AlloyChainClient, ChainClient};
use crate::config::{ServiceConfig, TlsConfig};
use crate::error::StartupError;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_termination;
use crate::observability::{init_logging, init_metrics};
use crate::transfer::{FeeStrategy, TransferHandler};

/// A bound, ready-to-serve service.
pub struct Service {
    server: HttpServer,
    listener: TcpListener,
    tls: Option<TlsConfig>,
}

impl Service {
    /// Wire the handler and HTTP front around `client` and bind the listener.
    pub async fn bind(config: &ServiceConfig, client: Arc<dyn ChainClient>) -> Result<Self, StartupError> {
        let network = config.network_mode();
        let fees = FeeStrategy::from_config(network, &config.fees);
        tracing::info!(network = network.label(), fees = ?fees, "Fee strategy selected");

        let state = AppState {
            handler: Arc::new(TransferHandler::new(client, fees)),
            network,
        };
        let server = HttpServer::new(state, &config.service);

        let listener = TcpListener::bind(&config.service.bind_address).await?;
        Ok(Self {
            server,
            listener,
            tls: config.service.tls.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, StartupError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` fires.
    pub async fn serve(self, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        match &self.tls {
            Some(tls) => self.server.run_tls(self.listener, tls, shutdown).await?,
            None => self.server.run(self.listener, shutdown).await?,
        }
        Ok(())
    }
}

/// Connect to the node selected by the configured network mode.
pub async fn connect(config: &ServiceConfig) -> Result<AlloyChainClient, StartupError> {
    let endpoint = config.endpoint();
    let client = AlloyChainClient::connect(&endpoint, &config.timeouts, &config.fees).await?;
    Ok(client)
}

/// Run the service with `config` until a termination signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = config.network_mode().label(),
        bind_address = %config.service.bind_address,
        "send-eth starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = connect(&config).await?;
    let service = Service::bind(&config, Arc::new(client)).await?;
    tracing::info!(address = %service.local_addr()?, "Listening for requests");

    let shutdown = Shutdown::new();
    let serving = tokio::spawn(service.serve(shutdown.subscribe()));

    wait_for_termination().await;
    shutdown.trigger();

    match serving.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
