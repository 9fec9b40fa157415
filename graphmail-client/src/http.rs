//! `reqwest`-backed [`EntityTransport`].

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::paths;
use crate::wire;
use async_trait::async_trait;
use graphmail_filter::{FILTER_PREFIX, SearchFilter};
use graphmail_model::catalog::mail_folder;
use graphmail_model::{
    CreateRequest, EntityTransport, ModelError, ModelResult, ObjectSchema, Persisted, PropertyBag,
    RelocateMode, SchemaRegistry,
};
use graphmail_types::{EntityKind, ItemId, MailFolderId, Mailbox, WellKnownFolder};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const CLIENT_REQUEST_ID: &str = "client-request-id";
const PREFER_UTC: &str = "outlook.timezone=\"UTC\"";

/// Talks to the mailbox REST API.
///
/// Every attempt carries a fresh bearer token and `client-request-id`.
/// Connect errors and HTTP 429 are retried with linear backoff up to
/// [`ClientConfig::max_retries`] times. Timeouts and 5xx are retried only
/// for idempotent methods, never for POST. Other failures are returned
/// immediately.
pub struct GraphTransport {
    config: ClientConfig,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
    registry: &'static SchemaRegistry,
}

impl GraphTransport {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            tokens,
            registry: SchemaRegistry::global(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends one request, retrying transient failures.
    ///
    /// Returns `None` for empty responses such as 204.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> ClientResult<Option<Value>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.tokens.access_token().await?;
            let request_id = Uuid::new_v4();
            debug!("{} {} (attempt {}, request {})", method, url, attempt, request_id);

            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(token)
                .header(CLIENT_REQUEST_ID, request_id.to_string())
                .header("Prefer", PREFER_UTC);
            if let Some(body) = body {
                request = request.json(body);
            }

            let retries_left = attempt <= self.config.max_retries;
            let idempotent = is_idempotent(&method);
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if retries_left && (e.is_connect() || (idempotent && e.is_timeout())) => {
                    let delay = self.config.backoff(attempt);
                    warn!("{} {} failed: {}; retrying in {:?}", method, url, e, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(ClientError::Network(format!("{method} {url}: {e}"))),
            };

            let status = response.status();
            if retries_left && is_transient(status, idempotent) {
                let delay = retry_after(&response)
                    .map(|delay| delay.min(self.config.timeout()))
                    .unwrap_or_else(|| self.config.backoff(attempt));
                warn!("{} {} returned {}; retrying in {:?}", method, url, status, delay);
                tokio::time::sleep(delay).await;
                continue;
            }
            return read_body(response).await;
        }
    }

    async fn send_for_object(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        self.send(method, url, body)
            .await?
            .ok_or_else(|| ClientError::decode("response", "empty body"))
    }

    /// Lists entities of `kind`, optionally filtered, collecting at most
    /// `top` of them across as many pages as needed.
    pub async fn find_items(
        &self,
        kind: EntityKind,
        mailbox: &Mailbox,
        parent: Option<&MailFolderId>,
        filter: Option<&SearchFilter>,
        top: usize,
    ) -> ClientResult<Vec<Persisted>> {
        let schema = self.registry.schema(kind)?;
        let mut url = format!(
            "{}?$top={}",
            self.config.url(&paths::collection(kind, mailbox, parent)),
            top.clamp(1, self.config.page_size)
        );
        if let Some(filter) = filter {
            let fragment = filter.fragment()?;
            url.push_str(&format!("&{FILTER_PREFIX}{}", urlencoding::encode(&fragment)));
        }

        let mut found = Vec::new();
        while found.len() < top {
            let page = self.send_for_object(Method::GET, &url, None).await?;
            let items = page
                .get("value")
                .and_then(Value::as_array)
                .ok_or_else(|| ClientError::decode("value", "expected an array of items"))?;
            for item in items.iter().take(top - found.len()) {
                found.push(wire::persisted_from_json(
                    kind,
                    mailbox,
                    Arc::clone(&schema),
                    item,
                )?);
            }
            match page.get("@odata.nextLink").and_then(Value::as_str) {
                Some(next) if self.is_api_url(next) => url = next.to_string(),
                Some(next) => {
                    return Err(ClientError::decode(
                        "@odata.nextLink",
                        format!("{next} is outside {}", self.config.api_base_url),
                    ));
                }
                None => break,
            }
        }
        debug!("Found {} {} item(s)", found.len(), kind);
        Ok(found)
    }

    /// Whether `url` points below the configured API base.
    fn is_api_url(&self, url: &str) -> bool {
        let base = self.config.api_base_url.trim_end_matches('/');
        url.strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
    }

    /// Resolves a folder by well-known name, else by display name.
    pub async fn resolve_folder(
        &self,
        mailbox: &Mailbox,
        name: &str,
    ) -> ClientResult<MailFolderId> {
        if let Ok(folder) = name.parse::<WellKnownFolder>() {
            return Ok(MailFolderId::well_known(folder, mailbox.clone()));
        }
        let filter = SearchFilter::is_equal_to(mail_folder::DISPLAY_NAME, name);
        let found = self
            .find_items(EntityKind::MailFolder, mailbox, None, Some(&filter), 1)
            .await?;
        match found.into_iter().next().map(|p| p.id) {
            Some(ItemId::MailFolder(id)) => Ok(id),
            _ => Err(ClientError::Model(ModelError::InvalidArgument(format!(
                "no folder named {name:?} in {mailbox}"
            )))),
        }
    }

    async fn create_item(&self, request: CreateRequest<'_>) -> ClientResult<Persisted> {
        let url = self
            .config
            .url(&paths::collection(request.kind, request.mailbox, request.parent));
        let body = wire::create_body(request.bag);
        let json = self.send_for_object(Method::POST, &url, Some(&body)).await?;
        wire::persisted_from_json(
            request.kind,
            request.mailbox,
            Arc::clone(request.bag.schema()),
            &json,
        )
    }

    async fn update_item(
        &self,
        id: &ItemId,
        bag: &PropertyBag,
    ) -> ClientResult<Option<PropertyBag>> {
        let url = self.config.url(&paths::item(id));
        let body = wire::patch_body(bag);
        match self.send(Method::PATCH, &url, Some(&body)).await? {
            Some(json) => Ok(Some(wire::bag_from_json(Arc::clone(bag.schema()), &json)?)),
            None => Ok(None),
        }
    }

    async fn fetch_item(&self, id: &ItemId, schema: Arc<ObjectSchema>) -> ClientResult<Persisted> {
        let url = self.config.url(&paths::item(id));
        let json = self.send_for_object(Method::GET, &url, None).await?;
        let bag = wire::bag_from_json(schema, &json)?;
        Ok(Persisted {
            id: id.clone(),
            bag,
        })
    }

    async fn relocate_item(
        &self,
        id: &ItemId,
        destination: &MailFolderId,
        mode: RelocateMode,
    ) -> ClientResult<Persisted> {
        let url = self.config.url(&paths::relocate(id, mode));
        let body = json!({ "destinationId": destination.id() });
        let json = self.send_for_object(Method::POST, &url, Some(&body)).await?;
        let schema = self.registry.schema(id.kind())?;
        wire::persisted_from_json(id.kind(), id.mailbox(), schema, &json)
    }
}

/// Methods that are safe to resend after the server may have acted on them.
fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::PATCH | Method::DELETE | Method::PUT
    )
}

/// 429 is resendable for any method; 5xx only for idempotent ones.
fn is_transient(status: StatusCode, idempotent: bool) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || (idempotent && status.is_server_error())
}

/// Server-requested delay, when given in seconds. Capped by the caller.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

async fn read_body(response: Response) -> ClientResult<Option<Value>> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("failed to read response: {e}")))?;
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClientError::Auth(format!("{status}: {text}")));
    }
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            body: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

#[async_trait]
impl EntityTransport for GraphTransport {
    async fn create(&self, request: CreateRequest<'_>) -> ModelResult<Persisted> {
        Ok(self.create_item(request).await?)
    }

    async fn update(&self, id: &ItemId, bag: &PropertyBag) -> ModelResult<Option<PropertyBag>> {
        Ok(self.update_item(id, bag).await?)
    }

    async fn delete(&self, id: &ItemId) -> ModelResult<()> {
        let url = self.config.url(&paths::item(id));
        self.send(Method::DELETE, &url, None).await?;
        Ok(())
    }

    async fn fetch(&self, id: &ItemId, schema: Arc<ObjectSchema>) -> ModelResult<Persisted> {
        Ok(self.fetch_item(id, schema).await?)
    }

    async fn relocate(
        &self,
        id: &ItemId,
        destination: &MailFolderId,
        mode: RelocateMode,
    ) -> ModelResult<Persisted> {
        Ok(self.relocate_item(id, destination, mode).await?)
    }
}
