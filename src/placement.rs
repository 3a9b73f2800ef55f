//! Places every open order of the current week view.
//!
//! Clicking an "order" button makes the portal re-render the menu, which
//! invalidates every other button handle from the same query. The loop
//! therefore clicks at most one button per query, waits for the page to
//! settle and queries again until no "order" button is left:
//!
//! ```text
//! Scanning --(no order buttons)--> Converged
//! Scanning --(order button)------> Placing --(settle delay)--> Scanning
//! ```

use crate::config::MenuSelectors;
use crate::order::{OrderControl, OrderKind, WeekOrders};
use crate::page::PageAccessor;
use crate::scanner;
use crate::{Error, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

enum State<E> {
    Scanning,
    Placing {
        control: OrderControl<E>,
        open: usize,
    },
    Converged,
}

/// Runs the scan/place cycle for one week view.
pub struct PlacementLoop<'a, P: PageAccessor + ?Sized> {
    page: &'a P,
    selectors: &'a MenuSelectors,
    settle_ms: u64,
}

impl<'a, P: PageAccessor + ?Sized> PlacementLoop<'a, P> {
    pub fn new(page: &'a P, selectors: &'a MenuSelectors, settle_ms: u64) -> Self {
        Self {
            page,
            selectors,
            settle_ms,
        }
    }

    /// Record the existing orders and place all open ones.
    ///
    /// Existing orders are taken from the first scan only; orders placed by
    /// this loop show up as "reduce" buttons afterwards and are reported as new.
    pub async fn run(&self) -> Result<WeekOrders> {
        let mut week = WeekOrders::default();
        let mut state = State::Scanning;
        let mut first_scan = true;
        let mut last_placed: Option<(NaiveDate, usize)> = None;

        loop {
            state = match state {
                State::Scanning => {
                    let placeable = if first_scan {
                        first_scan = false;
                        let scan = scanner::scan(self.page, self.selectors).await?;
                        week.existing = scan.existing.iter().map(OrderControl::record).collect();
                        scan.placeable
                    } else {
                        let placeable =
                            scanner::scan_kind(self.page, self.selectors, OrderKind::Placeable)
                                .await?;
                        info!("Found {} order buttons.", placeable.len());
                        placeable
                    };

                    let open = placeable.len();
                    if let Some((date, before)) = last_placed {
                        if open >= before {
                            return Err(Error::Stalled {
                                date,
                                remaining: open,
                            });
                        }
                    }

                    match placeable.into_iter().next() {
                        Some(control) => State::Placing { control, open },
                        None => State::Converged,
                    }
                }
                State::Placing { control, open } => {
                    debug!(
                        "New order option [{}]: {} ({} open)",
                        control.date, control.menu, open
                    );
                    self.page.click(&control.element).await?;
                    self.page.wait(self.settle_ms).await;
                    info!("Placed order for {}", control.date);

                    last_placed = Some((control.date, open));
                    week.new.push(control.record());
                    State::Scanning
                }
                State::Converged => {
                    debug!(
                        "Week converged: {} existing, {} new",
                        week.existing.len(),
                        week.new.len()
                    );
                    return Ok(week);
                }
            };
        }
    }
}

/// Convenience wrapper around [`PlacementLoop::run`].
pub async fn place_orders<P: PageAccessor + ?Sized>(
    page: &P,
    selectors: &MenuSelectors,
    settle_ms: u64,
) -> Result<WeekOrders> {
    PlacementLoop::new(page, selectors, settle_ms).run().await
}
