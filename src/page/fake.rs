//! Scripted in-memory menu page for tests.
//!
//! Behaves like the portal where it matters: clicking "order" turns the meal
//! into an existing order and rebuilds the page, so every handle issued before
//! the click goes stale and fails when used.

use super::PageAccessor;
use crate::config::MenuSelectors;
use crate::order::OrderKind;
use crate::{Error, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub(crate) struct FakeControl {
    kind: OrderKind,
    date: Option<String>,
    menu: Option<String>,
}

impl FakeControl {
    pub fn existing(date: &str, menu: &str) -> Self {
        Self {
            kind: OrderKind::Existing,
            date: Some(date.into()),
            menu: Some(menu.into()),
        }
    }

    pub fn placeable(date: &str, menu: &str) -> Self {
        Self {
            kind: OrderKind::Placeable,
            date: Some(date.into()),
            menu: Some(menu.into()),
        }
    }

    pub fn without_menu(mut self) -> Self {
        self.menu = None;
        self
    }

    pub fn with_date(mut self, date: Option<&str>) -> Self {
        self.date = date.map(String::from);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Query(String),
    Click(String),
    Wait(u64),
}

#[derive(Debug, Clone)]
pub(crate) enum FakeElement {
    Control {
        generation: u64,
        kind: OrderKind,
        index: usize,
    },
    MenuCell {
        generation: u64,
        kind: OrderKind,
        index: usize,
    },
    NextWeek {
        generation: u64,
    },
}

struct State {
    generation: u64,
    controls: Vec<FakeControl>,
    upcoming: VecDeque<Vec<FakeControl>>,
    next_week_buttons: Option<usize>,
    ignore_clicks: bool,
    events: Vec<Event>,
}

impl State {
    fn check(&self, generation: u64) -> Result<()> {
        if generation != self.generation {
            return Err(Error::Page("stale element reference".into()));
        }
        Ok(())
    }

    fn nth(&self, kind: OrderKind, index: usize) -> Result<&FakeControl> {
        self.controls
            .iter()
            .filter(|c| c.kind == kind)
            .nth(index)
            .ok_or_else(|| Error::Page(format!("no {} control #{}", kind, index)))
    }

    fn nth_mut(&mut self, kind: OrderKind, index: usize) -> Result<&mut FakeControl> {
        self.controls
            .iter_mut()
            .filter(|c| c.kind == kind)
            .nth(index)
            .ok_or_else(|| Error::Page(format!("no {} control #{}", kind, index)))
    }

    fn next_week_count(&self) -> usize {
        self.next_week_buttons
            .unwrap_or(usize::from(!self.upcoming.is_empty()))
    }
}

pub(crate) struct FakeMenuPage {
    selectors: MenuSelectors,
    state: RefCell<State>,
}

impl FakeMenuPage {
    /// A page showing the first of `weeks`; "next week" is offered while
    /// further weeks remain.
    pub fn new(mut weeks: Vec<Vec<FakeControl>>) -> Self {
        let controls = if weeks.is_empty() {
            Vec::new()
        } else {
            weeks.remove(0)
        };
        Self {
            selectors: MenuSelectors::default(),
            state: RefCell::new(State {
                generation: 0,
                controls,
                upcoming: weeks.into(),
                next_week_buttons: None,
                ignore_clicks: false,
                events: Vec::new(),
            }),
        }
    }

    pub fn week(controls: Vec<FakeControl>) -> Self {
        Self::new(vec![controls])
    }

    /// Force the number of "next week" buttons on the page.
    pub fn with_next_week_buttons(self, count: usize) -> Self {
        self.state.borrow_mut().next_week_buttons = Some(count);
        self
    }

    /// Make "order" clicks have no effect on the page.
    pub fn ignoring_clicks(self) -> Self {
        self.state.borrow_mut().ignore_clicks = true;
        self
    }

    pub fn selectors(&self) -> &MenuSelectors {
        &self.selectors
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Dates of the clicked order buttons, in click order.
    pub fn clicked_dates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Click(label) if label != "next-week" => Some(label),
                _ => None,
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl PageAccessor for FakeMenuPage {
    type Element = FakeElement;

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Query(selector.to_string()));
        let generation = state.generation;

        let kind = if selector == self.selectors.existing {
            OrderKind::Existing
        } else if selector == self.selectors.placeable {
            OrderKind::Placeable
        } else if selector == self.selectors.next_week {
            let count = state.next_week_count();
            return Ok((0..count)
                .map(|_| FakeElement::NextWeek { generation })
                .collect());
        } else {
            return Ok(Vec::new());
        };

        let count = state.controls.iter().filter(|c| c.kind == kind).count();
        Ok((0..count)
            .map(|index| FakeElement::Control {
                generation,
                kind,
                index,
            })
            .collect())
    }

    async fn related(&self, element: &FakeElement) -> Result<Option<FakeElement>> {
        let state = self.state.borrow();
        match *element {
            FakeElement::Control {
                generation,
                kind,
                index,
            } => {
                state.check(generation)?;
                let has_menu = state.nth(kind, index)?.menu.is_some();
                Ok(has_menu.then_some(FakeElement::MenuCell {
                    generation,
                    kind,
                    index,
                }))
            }
            _ => Ok(None),
        }
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        let state = self.state.borrow();
        match *element {
            FakeElement::Control {
                generation,
                kind,
                index,
            } => {
                state.check(generation)?;
                let control = state.nth(kind, index)?;
                Ok((name == self.selectors.date_attribute)
                    .then(|| control.date.clone())
                    .flatten())
            }
            _ => Ok(None),
        }
    }

    async fn text(&self, element: &FakeElement) -> Result<String> {
        let state = self.state.borrow();
        match *element {
            FakeElement::MenuCell {
                generation,
                kind,
                index,
            } => {
                state.check(generation)?;
                Ok(state.nth(kind, index)?.menu.clone().unwrap_or_default())
            }
            _ => Ok(String::new()),
        }
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match *element {
            FakeElement::Control {
                generation,
                kind: OrderKind::Placeable,
                index,
            } => {
                state.check(generation)?;
                let ignore = state.ignore_clicks;
                let control = state.nth_mut(OrderKind::Placeable, index)?;
                let label = control.date.clone().unwrap_or_default();
                if !ignore {
                    control.kind = OrderKind::Existing;
                }
                state.generation += 1;
                state.events.push(Event::Click(label));
                Ok(())
            }
            FakeElement::NextWeek { generation } => {
                state.check(generation)?;
                state.controls = state.upcoming.pop_front().unwrap_or_default();
                state.generation += 1;
                state.events.push(Event::Click("next-week".into()));
                Ok(())
            }
            _ => Err(Error::Page("element is not clickable".into())),
        }
    }

    async fn wait(&self, ms: u64) {
        self.state.borrow_mut().events.push(Event::Wait(ms));
    }
}
