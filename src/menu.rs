//! Menu text next to an order button, reduced to a one-line dish summary.
//!
//! A regular menu cell reads
//!
//! ```text
//! Menü 1
//! vegetarisch
//!
//! Gemüselasagne
//! mit Tomatensalat
//! (A, C, G)
//!
//! 4,20 €
//! ```
//!
//! i.e. three sections separated by blank lines, the middle one describing the
//! main dish with the allergen line last. The portal does not guarantee this
//! layout, so anything else is passed through as it is.

use crate::page::PageAccessor;
use tracing::warn;

/// Returned when the menu cell of a button can't be found or read.
pub const MISSING_MENU: &str = "Couldn't find menu details!";

/// Read the raw text of the menu cell belonging to `control`.
///
/// Page errors are logged and reported as `None`; they never abort a scan.
pub async fn menu_text<P: PageAccessor + ?Sized>(page: &P, control: &P::Element) -> Option<String> {
    let cell = match page.related(control).await {
        Ok(Some(cell)) => cell,
        Ok(None) => {
            warn!("{}", MISSING_MENU);
            return None;
        }
        Err(e) => {
            warn!("{} ({})", MISSING_MENU, e);
            return None;
        }
    };
    match page.text(&cell).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("{} ({})", MISSING_MENU, e);
            None
        }
    }
}

/// Summary for a menu cell's text, or the diagnostic text if there was none.
pub fn summary(raw: Option<&str>) -> String {
    match raw {
        Some(text) => summarize(text),
        None => MISSING_MENU.to_string(),
    }
}

/// Reduce menu text to its main dish on a single line.
///
/// Text that doesn't have exactly three blank-line separated sections is
/// returned unchanged.
pub fn summarize(text: &str) -> String {
    let sections: Vec<&str> = text.split("\n\n").collect();
    let [_, main, _] = sections.as_slice() else {
        warn!("Couldn't parse menu details!");
        return text.to_string();
    };

    let lines: Vec<&str> = main.split('\n').collect();
    lines[..lines.len() - 1].join(" ")
}

/// Locate and summarize the menu of `control` in one step.
pub async fn extract_summary<P: PageAccessor + ?Sized>(page: &P, control: &P::Element) -> String {
    summary(menu_text(page, control).await.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::{FakeControl, FakeMenuPage};

    #[test]
    fn test_summarize_regular_menu() {
        let text = "A\nB\n\nMain dish\nline two\nAllergens\n\nFooter";
        assert_eq!(summarize(text), "Main dish line two");
    }

    #[test]
    fn test_summarize_drops_allergen_line_only() {
        let text = "Menü 1\n\nGemüselasagne\n(A, C, G)\n\n4,20 €";
        assert_eq!(summarize(text), "Gemüselasagne");
    }

    #[test]
    fn test_summarize_single_line_main_section_is_empty() {
        assert_eq!(summarize("head\n\n(A, C)\n\nfoot"), "");
    }

    #[test]
    fn test_summarize_without_separator_is_identity() {
        let text = "Geschlossen\nFeiertag";
        assert_eq!(summarize(text), text);
    }

    #[test]
    fn test_summarize_one_separator_is_identity() {
        let text = "Menü 2\n\nNudeln mit Soße";
        assert_eq!(summarize(text), text);
    }

    #[test]
    fn test_summarize_too_many_sections_is_identity() {
        let text = "a\n\nb\n\nc\n\nd";
        assert_eq!(summarize(text), text);
    }

    #[test]
    fn test_summary_missing_text() {
        assert_eq!(summary(None), MISSING_MENU);
        assert_eq!(summary(Some("x\n\ny\nz\n\nw")), "y");
    }

    #[tokio::test]
    async fn test_extract_summary_from_page() {
        let page = FakeMenuPage::week(vec![FakeControl::placeable(
            "2024-01-09",
            "Menü 1\n\nSpaghetti\nBolognese\n(A, G)\n\n4,20 €",
        )]);
        let buttons = page.find_all(&page.selectors().placeable.clone()).await.unwrap();
        assert_eq!(extract_summary(&page, &buttons[0]).await, "Spaghetti Bolognese");
    }

    #[tokio::test]
    async fn test_extract_summary_without_menu_cell() {
        let page = FakeMenuPage::week(vec![
            FakeControl::placeable("2024-01-09", "ignored").without_menu()
        ]);
        let buttons = page.find_all(&page.selectors().placeable.clone()).await.unwrap();
        assert_eq!(extract_summary(&page, &buttons[0]).await, MISSING_MENU);
    }

    #[tokio::test]
    async fn test_extract_summary_on_stale_element_degrades() {
        let page = FakeMenuPage::week(vec![
            FakeControl::placeable("2024-01-09", "a\n\nb\nc\n\nd"),
            FakeControl::placeable("2024-01-10", "a\n\nb\nc\n\nd"),
        ]);
        let selector = page.selectors().placeable.clone();
        let buttons = page.find_all(&selector).await.unwrap();
        page.click(&buttons[0]).await.unwrap();
        assert_eq!(extract_summary(&page, &buttons[1]).await, MISSING_MENU);
    }
}
