//! Enumerates the order buttons of the current week view.

use crate::config::MenuSelectors;
use crate::menu;
use crate::order::{OrderControl, OrderKind};
use crate::page::PageAccessor;
use crate::{Error, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Order buttons found by one scan, each list in page order.
#[derive(Debug)]
pub struct Scan<E> {
    pub existing: Vec<OrderControl<E>>,
    pub placeable: Vec<OrderControl<E>>,
}

impl<E> Scan<E> {
    pub fn total(&self) -> usize {
        self.existing.len() + self.placeable.len()
    }
}

/// Query both kinds of order buttons and resolve their dates and menus.
///
/// An empty result is not an error: it is what the page shows past the end of
/// the ordering period.
pub async fn scan<P: PageAccessor + ?Sized>(
    page: &P,
    selectors: &MenuSelectors,
) -> Result<Scan<P::Element>> {
    let existing = scan_kind(page, selectors, OrderKind::Existing).await?;
    let placeable = scan_kind(page, selectors, OrderKind::Placeable).await?;
    let scan = Scan {
        existing,
        placeable,
    };
    info!("Found {} order buttons.", scan.total());
    Ok(scan)
}

/// Query and resolve the buttons of one kind.
pub async fn scan_kind<P: PageAccessor + ?Sized>(
    page: &P,
    selectors: &MenuSelectors,
    kind: OrderKind,
) -> Result<Vec<OrderControl<P::Element>>> {
    let selector = match kind {
        OrderKind::Existing => &selectors.existing,
        OrderKind::Placeable => &selectors.placeable,
    };
    let elements = page.find_all(selector).await?;
    debug!("{} {} buttons", elements.len(), kind);

    let mut controls = Vec::with_capacity(elements.len());
    for (position, element) in elements.into_iter().enumerate() {
        let value = page.attribute(&element, &selectors.date_attribute).await?;
        let date = parse_date(kind, position, value)?;
        let raw_text = menu::menu_text(page, &element).await;
        let menu = menu::summary(raw_text.as_deref());
        controls.push(OrderControl {
            kind,
            position,
            date,
            raw_text,
            menu,
            element,
        });
    }
    Ok(controls)
}

/// Parse a button's `YYYY-MM-DD` date attribute.
pub fn parse_date(kind: OrderKind, position: usize, value: Option<String>) -> Result<NaiveDate> {
    let Some(raw) = value.as_deref() else {
        return Err(Error::InvalidDate {
            kind,
            position,
            value,
            reason: "date attribute missing".into(),
        });
    };
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| Error::InvalidDate {
        kind,
        position,
        value: value.clone(),
        reason: e.to_string(),
    })
}
