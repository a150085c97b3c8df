//! `DocumentPort` over a CDP-attached browser tab

use std::time::Duration;

use action_primitives::{DocumentPort, ValueWrite};
use alphaloop_core_types::{
    BoundingBox, CoreError, ElementHandle, GateState, InteractionEvent, StructuralPredicate,
};
use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::CdpConfig;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::scripts;

const PAGE_POLL: Duration = Duration::from_millis(250);

/// A live tab driven through `Runtime.evaluate`.
pub struct CdpDocument {
    _browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl CdpDocument {
    /// Attach to the browser at `config.debugger_url` and pick the first tab
    /// whose URL matches `config.page_url_contains`.
    #[instrument(skip_all, fields(url = %config.debugger_url))]
    pub async fn connect(config: &CdpConfig) -> Result<Self, AdapterError> {
        let (mut browser, mut handler) =
            timeout(config.connect_timeout, Browser::connect(config.debugger_url.clone()))
                .await
                .map_err(|_| {
                    AdapterError::new(AdapterErrorKind::Connect)
                        .with_hint(format!("no answer within {:?}", config.connect_timeout))
                })?
                .map_err(|err| {
                    AdapterError::new(AdapterErrorKind::Connect).with_hint(err.to_string())
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    warn!(error = %err, "cdp handler error");
                }
            }
            debug!("cdp handler stopped");
        });

        if let Err(err) = browser.fetch_targets().await {
            debug!(error = %err, "fetch_targets failed, relying on discovered pages");
        }

        let deadline = Instant::now() + config.connect_timeout;
        loop {
            let pages = match browser.pages().await {
                Ok(pages) => pages,
                Err(err) => {
                    handler.abort();
                    return Err(
                        AdapterError::new(AdapterErrorKind::CdpIo).with_hint(err.to_string())
                    );
                }
            };
            for page in pages {
                let url = page.url().await.ok().flatten().unwrap_or_default();
                if config.matches_url(&url) {
                    info!(page_url = %url, "attached to page");
                    return Ok(Self {
                        _browser: browser,
                        page,
                        handler,
                    });
                }
            }
            if Instant::now() >= deadline {
                handler.abort();
                let wanted = config.page_url_contains.as_deref().unwrap_or("<any>");
                return Err(AdapterError::new(AdapterErrorKind::NoPage)
                    .with_hint(format!("no tab url contains {}", wanted)));
            }
            sleep(PAGE_POLL).await;
        }
    }

    async fn eval(&self, script: String) -> Result<Value, AdapterError> {
        let params = EvaluateParams::builder()
            .expression(script)
            .return_by_value(true)
            .await_promise(true)
            .user_gesture(true)
            .build()
            .map_err(|err| AdapterError::new(AdapterErrorKind::Script).with_hint(err))?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|err| AdapterError::new(AdapterErrorKind::CdpIo).with_hint(err.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn on_element(&self, handle: &ElementHandle, body: &str) -> Result<Value, CoreError> {
        let raw = self.eval(scripts::on_element(handle, body)).await?;
        scripts::unwrap_envelope(handle, raw)
    }

    async fn on_element_as<T: DeserializeOwned>(
        &self,
        handle: &ElementHandle,
        body: &str,
    ) -> Result<T, CoreError> {
        let value = self.on_element(handle, body).await?;
        serde_json::from_value(value).map_err(|err| {
            CoreError::from(AdapterError::new(AdapterErrorKind::Script).with_hint(err.to_string()))
        })
    }
}

impl Drop for CdpDocument {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[derive(Deserialize)]
struct Gate {
    disabled: bool,
    read_only: bool,
}

#[derive(Deserialize)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[async_trait]
impl DocumentPort for CdpDocument {
    async fn query(
        &self,
        predicate: &StructuralPredicate,
    ) -> Result<Vec<ElementHandle>, CoreError> {
        let prefix = Uuid::new_v4().simple().to_string();
        let raw = self.eval(scripts::query(&predicate.to_css(), &prefix)).await?;
        let tokens: Vec<String> = serde_json::from_value(raw).map_err(|err| {
            CoreError::from(AdapterError::new(AdapterErrorKind::Script).with_hint(err.to_string()))
        })?;
        Ok(tokens.into_iter().map(ElementHandle).collect())
    }

    async fn text_content(&self, handle: &ElementHandle) -> Result<String, CoreError> {
        self.on_element_as(handle, scripts::TEXT_CONTENT).await
    }

    async fn attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, CoreError> {
        self.on_element_as(handle, &scripts::attribute(name)).await
    }

    async fn set_attribute(
        &self,
        handle: &ElementHandle,
        name: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        self.on_element(handle, &scripts::set_attribute(name, value))
            .await
            .map(|_| ())
    }

    async fn gate(&self, handle: &ElementHandle) -> Result<GateState, CoreError> {
        let gate: Gate = self.on_element_as(handle, scripts::GATE).await?;
        Ok(GateState {
            disabled: gate.disabled,
            read_only: gate.read_only,
        })
    }

    async fn set_gate(&self, handle: &ElementHandle, gate: GateState) -> Result<(), CoreError> {
        self.on_element(handle, &scripts::set_gate(gate))
            .await
            .map(|_| ())
    }

    async fn bounding_box(&self, handle: &ElementHandle) -> Result<BoundingBox, CoreError> {
        let rect: Rect = self.on_element_as(handle, scripts::BOUNDING_BOX).await?;
        Ok(BoundingBox {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        })
    }

    async fn focus(&self, handle: &ElementHandle) -> Result<(), CoreError> {
        self.on_element(handle, scripts::FOCUS).await.map(|_| ())
    }

    async fn blur(&self, handle: &ElementHandle) -> Result<(), CoreError> {
        self.on_element(handle, scripts::BLUR).await.map(|_| ())
    }

    async fn dispatch(&self, event: &InteractionEvent) -> Result<(), CoreError> {
        self.on_element(&event.target, &scripts::dispatch(event))
            .await
            .map(|_| ())
    }

    async fn write_base_value(
        &self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<ValueWrite, CoreError> {
        let written: bool = self
            .on_element_as(handle, &scripts::write_base_value(value))
            .await?;
        Ok(if written {
            ValueWrite::Written
        } else {
            ValueWrite::SetterUnavailable
        })
    }

    async fn value(&self, handle: &ElementHandle) -> Result<String, CoreError> {
        self.on_element_as(handle, scripts::VALUE).await
    }
}
