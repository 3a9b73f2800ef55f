//! The page capability the ordering logic works against.
//!
//! Everything that reads or clicks the menu page goes through [`PageAccessor`],
//! so the scanning and placement logic never sees the browser directly.

mod browser;
#[cfg(test)]
pub(crate) mod fake;

pub use browser::{EokaElement, EokaPage};

use crate::Result;
use async_trait::async_trait;

/// Read and click access to the currently displayed page.
///
/// Element handles are tied to the page state they were queried from. After
/// any `click`, every handle obtained before it must be treated as stale and
/// the page queried again.
///
/// One session drives one page strictly sequentially, so the futures are not
/// required to be `Send`.
#[async_trait(?Send)]
pub trait PageAccessor {
    type Element;

    /// All elements matching a CSS selector, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// The element holding the description of `element`: two levels up, then
    /// the nearest preceding sibling. `None` if the page has no such element.
    async fn related(&self, element: &Self::Element) -> Result<Option<Self::Element>>;

    /// Value of a named attribute, `None` if it is not set.
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Rendered text of the element.
    async fn text(&self, element: &Self::Element) -> Result<String>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Block for `ms` milliseconds so the page can re-render.
    async fn wait(&self, ms: u64);
}
