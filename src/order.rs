//! Order controls found on the menu page and the records derived from them.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Which of the two order buttons a control is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// "Reduce order" button: the meal is already ordered.
    Existing,
    /// "Order" button: the meal can still be ordered.
    Placeable,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Existing => f.write_str("existing"),
            OrderKind::Placeable => f.write_str("placeable"),
        }
    }
}

/// An order button as seen by one scan of the page.
///
/// The element handle is only valid until the next click on the page; a
/// control must never be carried over to a later scan.
#[derive(Debug, Clone)]
pub struct OrderControl<E> {
    pub kind: OrderKind,
    /// Zero-based position among the controls of the same kind, in page order.
    pub position: usize,
    pub date: NaiveDate,
    /// Text of the menu cell next to the button, if there is one.
    pub raw_text: Option<String>,
    /// Single-line menu description (or diagnostic text if it couldn't be read).
    pub menu: String,
    pub element: E,
}

impl<E> OrderControl<E> {
    /// Turn the control into its durable record, dropping the element handle.
    pub fn record(&self) -> OrderRecord {
        OrderRecord {
            date: self.date,
            menu: self.menu.clone(),
        }
    }
}

/// One existing or newly placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub date: NaiveDate,
    pub menu: String,
}

/// Orders found in one week view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekOrders {
    /// Orders that were already placed before this run, in page order.
    pub existing: Vec<OrderRecord>,
    /// Orders placed by this run, in the order they were clicked.
    pub new: Vec<OrderRecord>,
}

impl WeekOrders {
    pub fn is_empty(&self) -> bool {
        self.existing.is_empty() && self.new.is_empty()
    }
}
