pub mod query;
pub mod wait;
pub mod webdriver;

use async_trait::async_trait;
use thiserror::Error;

pub use query::{Predicate, Query};
pub use wait::{Timeouts, wait_for_element, wait_for_visible, wait_until};
pub use webdriver::{WebDriverFactory, WebDriverSession};

#[derive(Error, Debug, Clone)]
pub enum BrowserError {
    #[error("webdriver transport error: {0}")]
    Http(String),
    #[error("webdriver error {error}: {message}")]
    WebDriver { error: String, message: String },
    #[error("unexpected webdriver response: {0}")]
    Protocol(String),
    #[error("could not decode webdriver payload: {0}")]
    Decode(String),
}

impl BrowserError {
    /// True when the element the call referred to is gone from the page.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            BrowserError::WebDriver { error, .. }
                if error == "stale element reference" || error == "no such element"
        )
    }
}

impl From<reqwest::Error> for BrowserError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<base64::DecodeError> for BrowserError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Opaque reference to an element inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One live browser tab. Lookups never fail for "not found": they return an
/// empty `Vec` and the caller decides what absence means.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    async fn find_all(&self, query: &Query) -> Result<Vec<ElementHandle>, BrowserError>;

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        query: &Query,
    ) -> Result<Vec<ElementHandle>, BrowserError>;

    /// Script click, so overlays cannot intercept it.
    async fn click(&self, element: &ElementHandle) -> Result<(), BrowserError>;

    /// Selects the `<option>` of `select` whose value is exactly `value`.
    /// `Ok(false)` when no such option exists.
    async fn select_option(
        &self,
        select: &ElementHandle,
        value: &str,
    ) -> Result<bool, BrowserError>;

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), BrowserError>;

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, BrowserError>;

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    async fn outer_html(&self, element: &ElementHandle) -> Result<String, BrowserError>;

    async fn text(&self, element: &ElementHandle) -> Result<String, BrowserError>;

    async fn is_stale(&self, element: &ElementHandle) -> Result<bool, BrowserError>;

    /// Full-page PNG.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    async fn close(&self) -> Result<(), BrowserError>;
}

#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}
