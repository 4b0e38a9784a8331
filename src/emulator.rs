use std::time::Duration;

use testcontainers_modules::{
    localstack::LocalStack,
    testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt},
};
use tracing::info;

use crate::{
    config::EmulatorConfig,
    error::{Error, Result},
    kinesis::{EndpointConfig, KinesisStreamClient, StreamClient},
    util::retry::{with_retry, FixedCountWithDelayStrategy},
};

const EDGE_PORT: u16 = 4566;
const READY_ATTEMPTS: usize = 30;
const READY_DELAY: Duration = Duration::from_secs(1);

/// The service endpoint for one run. When it owns a container, dropping the
/// emulator stops and removes it.
pub struct Emulator {
    endpoint: EndpointConfig,
    _container: Option<ContainerAsync<LocalStack>>,
}

impl Emulator {
    /// Attaches to `config.endpoint` when set, otherwise starts LocalStack.
    pub async fn from_config(config: &EmulatorConfig) -> Result<Self> {
        match &config.endpoint {
            Some(endpoint) => Ok(Self::external(config, endpoint.clone())),
            None => Self::start(config).await,
        }
    }

    pub async fn start(config: &EmulatorConfig) -> Result<Self> {
        info!("Starting localstack/localstack:{}...", config.localstack_tag);
        let container = LocalStack::default()
            .with_tag(config.localstack_tag.clone())
            .with_env_var("SERVICES", "kinesis")
            .start()
            .await
            .map_err(|e| Error::Emulator(e.to_string()))?;
        let host = container
            .get_host()
            .await
            .map_err(|e| Error::Emulator(e.to_string()))?;
        let port = container
            .get_host_port_ipv4(EDGE_PORT)
            .await
            .map_err(|e| Error::Emulator(e.to_string()))?;

        let endpoint = format!("http://{}:{}", host, port);
        info!("LocalStack listening on {}", endpoint);
        Ok(Self {
            endpoint: endpoint_config(config, endpoint),
            _container: Some(container),
        })
    }

    pub fn external(config: &EmulatorConfig, endpoint: String) -> Self {
        info!("Using running endpoint {}", endpoint);
        Self {
            endpoint: endpoint_config(config, endpoint),
            _container: None,
        }
    }

    /// A client for this endpoint, returned once the service answers requests.
    pub async fn connect(&self) -> Result<KinesisStreamClient> {
        let client = KinesisStreamClient::new(&self.endpoint)?;
        wait_until_ready(&client).await?;
        Ok(client)
    }
}

pub async fn wait_until_ready<C: StreamClient>(client: &C) -> Result<()> {
    let streams = with_retry(
        || client.list_streams(),
        FixedCountWithDelayStrategy::new("list_streams", READY_ATTEMPTS, READY_DELAY),
    )
    .await?;
    info!("Kinesis is ready ({} existing streams)", streams.len());
    Ok(())
}

fn endpoint_config(config: &EmulatorConfig, endpoint: String) -> EndpointConfig {
    EndpointConfig {
        endpoint,
        region: config.region.clone(),
        access_key: config.access_key.clone(),
        secret_key: config.secret_key.clone(),
    }
}
