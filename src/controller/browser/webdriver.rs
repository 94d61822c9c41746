use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::query::xpath_literal;
use super::{BrowserError, BrowserSession, ElementHandle, Query, SessionFactory};

/// W3C element reference key.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Upper bound for any single WebDriver call, page loads included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens sessions against a running WebDriver server (chromedriver by
/// default).
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    client: Client,
    base_url: String,
    headless: bool,
}

impl WebDriverFactory {
    /// # Errors
    ///
    /// Will return `Err` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, headless: bool) -> Result<Self, BrowserError> {
        Self::with_timeouts(base_url, headless, REQUEST_TIMEOUT, CONNECT_TIMEOUT)
    }

    /// # Errors
    ///
    /// Will return `Err` if the HTTP client cannot be built.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        headless: bool,
        request: Duration,
        connect: Duration,
    ) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(request)
            .connect_timeout(connect)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headless,
        })
    }

    fn capabilities(&self) -> Value {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--window-size=1920,1080",
        ];
        if self.headless {
            args.push("--headless=new");
        }
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }
}

#[async_trait]
impl SessionFactory for WebDriverFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let value = send(
            self.client
                .post(format!("{}/session", self.base_url))
                .json(&self.capabilities()),
        )
        .await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| BrowserError::Protocol("new session response has no sessionId".into()))?
            .to_string();
        debug!(%session_id, "opened webdriver session");

        Ok(Box::new(WebDriverSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session_id,
        }))
    }
}

#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{path}", self.base_url, self.session_id)
    }

    async fn get(&self, path: &str) -> Result<Value, BrowserError> {
        send(self.client.get(self.url(path))).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, BrowserError> {
        send(self.client.post(self.url(path)).json(body)).await
    }

    async fn execute(&self, script: &str, element: &ElementHandle) -> Result<Value, BrowserError> {
        self.post(
            "/execute/sync",
            &json!({ "script": script, "args": [element_ref(element)] }),
        )
        .await
    }

    async fn full_page_screenshot(&self) -> Result<String, BrowserError> {
        let value = self
            .post(
                "/goog/cdp/execute",
                &json!({
                    "cmd": "Page.captureScreenshot",
                    "params": { "format": "png", "captureBeyondViewport": true }
                }),
            )
            .await?;
        value
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Protocol("cdp screenshot has no data".into()))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.post("/url", &json!({ "url": url })).await?;
        Ok(())
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<ElementHandle>, BrowserError> {
        let value = self
            .post(
                "/elements",
                &json!({ "using": "xpath", "value": query.to_xpath() }),
            )
            .await?;
        parse_elements(&value)
    }

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        query: &Query,
    ) -> Result<Vec<ElementHandle>, BrowserError> {
        let value = self
            .post(
                &format!("/element/{}/elements", parent.id()),
                &json!({ "using": "xpath", "value": query.to_descendant_xpath() }),
            )
            .await?;
        parse_elements(&value)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.execute("arguments[0].click();", element).await?;
        Ok(())
    }

    async fn select_option(
        &self,
        select: &ElementHandle,
        value: &str,
    ) -> Result<bool, BrowserError> {
        let found = self
            .post(
                &format!("/element/{}/elements", select.id()),
                &json!({
                    "using": "xpath",
                    "value": format!(".//option[@value={}]", xpath_literal(value)),
                }),
            )
            .await?;
        let Some(option) = parse_elements(&found)?.into_iter().next() else {
            return Ok(false);
        };
        // native click; a script click does not change a <select>
        self.post(&format!("/element/{}/click", option.id()), &json!({}))
            .await?;
        Ok(true)
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), BrowserError> {
        self.execute("arguments[0].scrollIntoView(true);", element)
            .await?;
        Ok(())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        let value = self
            .get(&format!("/element/{}/displayed", element.id()))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let value = self
            .get(&format!("/element/{}/attribute/{name}", element.id()))
            .await?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    async fn outer_html(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        let value = self
            .get(&format!("/element/{}/property/outerHTML", element.id()))
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BrowserError::Protocol("outerHTML is not a string".into()))
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError> {
        let value = self.get(&format!("/element/{}/text", element.id())).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_stale(&self, element: &ElementHandle) -> Result<bool, BrowserError> {
        match self.get(&format!("/element/{}/enabled", element.id())).await {
            Ok(_) => Ok(false),
            Err(e) if e.is_stale() => Ok(true),
            Err(e) => Err(e),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let encoded = match self.full_page_screenshot().await {
            Ok(data) => data,
            Err(e) => {
                debug!("full-page screenshot unavailable ({e}), using viewport");
                self.get("/screenshot")
                    .await?
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| BrowserError::Protocol("screenshot is not a string".into()))?
            }
        };
        Ok(STANDARD.decode(encoded)?)
    }

    async fn close(&self) -> Result<(), BrowserError> {
        send(self.client.delete(self.url(""))).await?;
        debug!(session_id = %self.session_id, "closed webdriver session");
        Ok(())
    }
}

/// Sends a request and unwraps the W3C `{"value": ...}` envelope.
async fn send(request: RequestBuilder) -> Result<Value, BrowserError> {
    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Err(BrowserError::WebDriver {
        error: field("error"),
        message: field("message"),
    })
}

fn element_ref(element: &ElementHandle) -> Value {
    json!({ ELEMENT_KEY: element.id() })
}

fn parse_elements(value: &Value) -> Result<Vec<ElementHandle>, BrowserError> {
    let elements = value
        .as_array()
        .ok_or_else(|| BrowserError::Protocol("find elements did not return an array".into()))?;
    elements
        .iter()
        .map(|el| {
            el.get(ELEMENT_KEY)
                .or_else(|| el.get("ELEMENT"))
                .and_then(Value::as_str)
                .map(ElementHandle::new)
                .ok_or_else(|| BrowserError::Protocol(format!("not an element reference: {el}")))
        })
        .collect()
}
