use crate::config::{Config, MenuSelectors};
use crate::navigator;
use crate::order::WeekOrders;
use crate::page::PageAccessor;
use crate::placement::PlacementLoop;
use crate::report::RunReport;
use crate::Result;
use tracing::{debug, info};

/// Places all open orders, week after week, on an already opened menu page.
pub struct OrderRun<P: PageAccessor> {
    page: P,
    selectors: MenuSelectors,
    settle_ms: u64,
    max_weeks: Option<u32>,
}

impl<P: PageAccessor> OrderRun<P> {
    /// Create a run using the menu selectors and timing of `config`.
    pub fn new(page: P, config: &Config) -> Self {
        Self {
            page,
            selectors: config.menu.clone(),
            settle_ms: config.timing.settle_ms,
            max_weeks: config.timing.max_weeks,
        }
    }

    /// Create a run with explicit selectors and settle delay and no week limit.
    pub fn with_selectors(page: P, selectors: MenuSelectors, settle_ms: u64) -> Self {
        Self {
            page,
            selectors,
            settle_ms,
            max_weeks: None,
        }
    }

    /// Stop after `weeks` week views.
    pub fn max_weeks(mut self, weeks: u32) -> Self {
        self.max_weeks = Some(weeks);
        self
    }

    /// Get a reference to the page accessor.
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Record existing and place all open orders of the current week view.
    pub async fn place_week(&self) -> Result<WeekOrders> {
        PlacementLoop::new(&self.page, &self.selectors, self.settle_ms)
            .run()
            .await
    }

    /// Process the current week and every following one.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_with(|_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_week` as soon as a week is done.
    pub async fn run_with<F>(&self, mut on_week: F) -> Result<RunReport>
    where
        F: FnMut(&WeekOrders),
    {
        let mut report = RunReport::default();

        loop {
            let week = self.place_week().await?;
            on_week(&week);
            report.push(week);

            if let Some(max) = self.max_weeks {
                if report.weeks.len() >= max as usize {
                    info!("Stopping after {} week(s) as configured", max);
                    break;
                }
            }

            if !navigator::advance_week(&self.page, &self.selectors).await? {
                info!("No more 'next week' button found, end of order period reached.");
                report.period_end = true;
                break;
            }
            debug!("Waiting {}ms for the next week to load", self.settle_ms);
            self.page.wait(self.settle_ms).await;
        }

        info!("{}", report.totals());
        Ok(report)
    }
}
