//! Human-readable summaries of found and placed orders.

use crate::order::{OrderRecord, WeekOrders};
use serde::Serialize;
use std::fmt::{self, Write};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Printed between the summaries of two consecutive week views.
pub const NEXT_WEEK_SEPARATOR: &str = "====== Navigating to next week... ======";

/// Render the summary of one week view.
///
/// Returns an empty string when there is nothing to report. Orders are listed
/// in the order they were found on the page.
pub fn summarize(existing: &[OrderRecord], new: &[OrderRecord]) -> String {
    let mut dates = existing.iter().chain(new).map(|o| o.date);
    let Some(first) = dates.next() else {
        return String::new();
    };
    let (from, to) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

    let mut out = format!(
        "------ Summary for [{}] to [{}] ------\n",
        from.format(DATE_FORMAT),
        to.format(DATE_FORMAT)
    );
    if !existing.is_empty() {
        out.push_str("\n--- Existing orders:\n");
        push_orders(&mut out, existing);
    }
    if !new.is_empty() {
        out.push_str("\n--- Newly placed orders:\n");
        push_orders(&mut out, new);
    }
    out
}

fn push_orders(out: &mut String, orders: &[OrderRecord]) {
    for order in orders {
        // Writing to a String never fails.
        let _ = writeln!(out, "> [{}] - {}", order.date.format(DATE_FORMAT), order.menu);
    }
}

impl WeekOrders {
    pub fn summary(&self) -> String {
        summarize(&self.existing, &self.new)
    }
}

/// Output for the `index`-th week view of a run, counting from 0.
///
/// Every week after the first was reached by navigating, so it starts with
/// [`NEXT_WEEK_SEPARATOR`] even when the week itself has nothing to report.
pub fn week_block(index: usize, week: &WeekOrders) -> String {
    let summary = week.summary();
    match (index, summary.is_empty()) {
        (0, _) => summary,
        (_, true) => NEXT_WEEK_SEPARATOR.to_string(),
        (_, false) => format!("{}\n{}", NEXT_WEEK_SEPARATOR, summary),
    }
}

/// Everything one run found, week by week.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub weeks: Vec<WeekOrders>,
    /// The last week view offered no way forward.
    pub period_end: bool,
}

impl RunReport {
    pub fn push(&mut self, week: WeekOrders) {
        self.weeks.push(week);
    }

    /// All existing orders of the run, in discovery order.
    pub fn existing(&self) -> impl Iterator<Item = &OrderRecord> {
        self.weeks.iter().flat_map(|w| &w.existing)
    }

    /// All orders placed by the run, in placement order.
    pub fn new_orders(&self) -> impl Iterator<Item = &OrderRecord> {
        self.weeks.iter().flat_map(|w| &w.new)
    }

    pub fn totals(&self) -> Totals {
        Totals {
            weeks: self.weeks.len(),
            existing: self.existing().count(),
            new: self.new_orders().count(),
        }
    }
}

/// Order counts of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub weeks: usize,
    pub existing: usize,
    pub new: usize,
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} week(s) checked: {} existing order(s), {} newly placed",
            self.weeks, self.existing, self.new
        )
    }
}
