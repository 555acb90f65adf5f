use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::device::{Device, DeviceOptions};
use crate::protocol::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE_TAG, REMOTE_PLANTS_PATH, VELIS_PLANTS_PATH};
use crate::session::Session;
use crate::types::DeviceAttributes;
use crate::{Error, Result};

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(3);

pub struct AristonClientBuilder {
    username: String,
    password: String,
    base_url: String,
    retry_backoff: Duration,
    metric: bool,
    language_tag: String,
}

impl AristonClientBuilder {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            metric: true,
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Delay before the single retry of a failed request.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Metric (`si`) or imperial (`us`) units for item-list plants.
    pub fn metric(mut self, metric: bool) -> Self {
        self.metric = metric;
        self
    }

    pub fn language_tag(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = tag.into();
        self
    }

    pub fn build(self) -> Result<AristonClient> {
        let http = reqwest::Client::builder().build()?;
        let session = Session::new(
            http,
            &self.base_url,
            self.username,
            self.password,
            self.retry_backoff,
        );
        Ok(AristonClient {
            session: Arc::new(session),
            options: DeviceOptions {
                umsys: if self.metric { "si" } else { "us" },
                language_tag: self.language_tag,
            },
            discovered: None,
        })
    }
}

/// Entry point: logs in, lists the account's plants and hands out
/// [`Device`]s sharing one session.
pub struct AristonClient {
    session: Arc<Session>,
    options: DeviceOptions,
    discovered: Option<Vec<DeviceAttributes>>,
}

impl AristonClient {
    pub fn builder(username: impl Into<String>, password: impl Into<String>) -> AristonClientBuilder {
        AristonClientBuilder::new(username, password)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Log in. A reply without a token is an authentication failure.
    pub async fn connect(&mut self) -> Result<()> {
        debug!(base_url = %self.session.base_url(), "connecting to Ariston NET");
        if self.session.login().await? {
            Ok(())
        } else {
            Err(Error::Authentication("login returned no token".into()))
        }
    }

    /// Both plant collections, concatenated. Elements without a gateway id
    /// are dropped.
    pub async fn discover(&mut self) -> Result<Vec<DeviceAttributes>> {
        if !self.session.has_token().await {
            return Err(Error::NotConnected);
        }

        let (remote, velis) = tokio::try_join!(
            self.session.get(REMOTE_PLANTS_PATH, &[]),
            self.session.get(VELIS_PLANTS_PATH, &[]),
        )?;

        let devices: Vec<DeviceAttributes> = [remote, velis]
            .into_iter()
            .flat_map(plant_rows)
            .filter_map(|row| match serde_json::from_value::<DeviceAttributes>(row) {
                Ok(attributes) => Some(attributes),
                Err(e) => {
                    warn!(error = %e, "skipping malformed plant entry");
                    None
                }
            })
            .collect();

        debug!(count = devices.len(), "discovered plants");
        self.discovered = Some(devices.clone());
        Ok(devices)
    }

    async fn discovered(&mut self) -> Result<Vec<DeviceAttributes>> {
        match &self.discovered {
            Some(devices) => Ok(devices.clone()),
            None => self.discover().await,
        }
    }

    /// The device behind `gateway`, or `None` when the account has no such
    /// plant or its type is not supported.
    pub async fn device(&mut self, gateway: &str) -> Result<Option<Device>> {
        let Some(attributes) = self
            .discovered()
            .await?
            .into_iter()
            .find(|a| a.gateway == gateway)
        else {
            return Ok(None);
        };
        Ok(self.resolve(attributes))
    }

    /// Every supported device of the account.
    pub async fn devices(&mut self) -> Result<Vec<Device>> {
        Ok(self
            .discovered()
            .await?
            .into_iter()
            .filter_map(|attributes| self.resolve(attributes))
            .collect())
    }

    fn resolve(&self, attributes: DeviceAttributes) -> Option<Device> {
        let gateway = attributes.gateway.clone();
        match Device::new(Arc::clone(&self.session), attributes, self.options.clone()) {
            Ok(device) => Some(device),
            Err(e) => {
                warn!(gateway = %gateway, error = %e, "skipping unsupported device");
                None
            }
        }
    }
}

fn plant_rows(collection: Option<Value>) -> Vec<Value> {
    match collection {
        Some(Value::Array(rows)) => rows,
        _ => Vec::new(),
    }
}
