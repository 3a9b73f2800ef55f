//! [`PageAccessor`] on top of an `eoka` browser page.
//!
//! eoka addresses elements by CSS selector only, so an element here is a
//! JavaScript expression ("the n-th match of this selector") that is resolved
//! again on every call. This is exactly as stale as a WebDriver reference:
//! after a click the n-th match may be a different element or none at all.

use super::PageAccessor;
use crate::{Error, Result};
use async_trait::async_trait;
use eoka::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::trace;

/// An element of an [`EokaPage`], addressed by a JavaScript expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EokaElement {
    expr: String,
}

impl EokaElement {
    fn nth(selector: &str, index: usize) -> Result<Self> {
        Ok(Self {
            expr: format!(
                "document.querySelectorAll({})[{}]",
                serde_json::to_string(selector)?,
                index
            ),
        })
    }

    fn menu_cell(&self) -> Self {
        Self {
            expr: format!(
                "(({})?.parentElement?.parentElement?.previousElementSibling ?? null)",
                self.expr
            ),
        }
    }
}

impl fmt::Display for EokaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Result of running a snippet against one element.
#[derive(Deserialize)]
struct Lookup<T> {
    found: bool,
    value: Option<T>,
}

/// Wraps an eoka `Page` as a [`PageAccessor`].
pub struct EokaPage<'a> {
    page: &'a Page,
}

impl<'a> EokaPage<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Run `body` with `el` bound to the element; fails if the element is gone.
    async fn with_element<T: DeserializeOwned>(
        &self,
        element: &EokaElement,
        body: &str,
    ) -> Result<Option<T>> {
        let js = format!(
            "(() => {{ const el = {}; if (!el) return {{ found: false, value: null }}; return {{ found: true, value: ({}) }}; }})()",
            element.expr, body
        );
        trace!("evaluate: {}", js);
        let lookup: Lookup<T> = self.page.evaluate(&js).await?;
        if !lookup.found {
            return Err(Error::Page(format!("element no longer on the page: {}", element)));
        }
        Ok(lookup.value)
    }
}

#[async_trait(?Send)]
impl PageAccessor for EokaPage<'_> {
    type Element = EokaElement;

    async fn find_all(&self, selector: &str) -> Result<Vec<EokaElement>> {
        let js = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        let count: usize = self.page.evaluate(&js).await?;
        (0..count).map(|i| EokaElement::nth(selector, i)).collect()
    }

    async fn related(&self, element: &EokaElement) -> Result<Option<EokaElement>> {
        let cell = element.menu_cell();
        let js = format!("!!{}", cell.expr);
        let exists: bool = self.page.evaluate(&js).await?;
        Ok(exists.then_some(cell))
    }

    async fn attribute(&self, element: &EokaElement, name: &str) -> Result<Option<String>> {
        let body = format!("el.getAttribute({})", serde_json::to_string(name)?);
        self.with_element(element, &body).await
    }

    async fn text(&self, element: &EokaElement) -> Result<String> {
        let text: Option<String> = self.with_element(element, "el.innerText").await?;
        Ok(text.unwrap_or_default())
    }

    async fn click(&self, element: &EokaElement) -> Result<()> {
        let _: Option<bool> = self
            .with_element(element, "(el.scrollIntoView({block:'center'}), el.click(), true)")
            .await?;
        Ok(())
    }

    async fn wait(&self, ms: u64) {
        self.page.wait(ms).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_escapes_selector() {
        let el = EokaElement::nth(r#"[title="Bestellen"]"#, 2).unwrap();
        assert_eq!(
            el.to_string(),
            r#"document.querySelectorAll("[title=\"Bestellen\"]")[2]"#
        );
    }

    #[test]
    fn test_menu_cell_walks_two_up_then_previous_sibling() {
        let el = EokaElement::nth(".order", 0).unwrap();
        let cell = el.menu_cell();
        assert!(cell
            .to_string()
            .contains("?.parentElement?.parentElement?.previousElementSibling"));
        assert!(cell.to_string().starts_with("((document.querySelectorAll"));
    }
}
