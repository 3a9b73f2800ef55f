//! Moves the menu view one week ahead.

use crate::config::MenuSelectors;
use crate::page::PageAccessor;
use crate::Result;
use tracing::{debug, info};

/// Click the "next week" button if the page shows exactly one.
///
/// Returns `false` when there is none (end of the ordering period) or more than
/// one (a page layout we don't know, so nothing is clicked). After `true` the
/// caller must let the page settle before scanning.
pub async fn advance_week<P: PageAccessor + ?Sized>(
    page: &P,
    selectors: &MenuSelectors,
) -> Result<bool> {
    let buttons = page.find_all(&selectors.next_week).await?;
    let [button] = buttons.as_slice() else {
        debug!("{} 'next week' buttons found, not navigating", buttons.len());
        return Ok(false);
    };

    info!("Navigating to next week...");
    page.click(button).await?;
    Ok(true)
}
