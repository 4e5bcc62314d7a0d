//! Date navigation and task selection state for the day view.
//!
//! All view state lives in [`NavigationState`] and changes only through its
//! transition methods, which the event loop calls. Keyboard selection hands
//! out a [`DeselectTicket`]; the timer that carries it reports back with
//! [`NavigationState::on_deselect_timeout`], and a ticket from an older
//! selection is ignored.

use chrono::{Duration, NaiveDate};

/// Generation of the selection a deselect timer was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeselectTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    date: NaiveDate,
    selected: Option<usize>,
    task_count: usize,
    generation: u64,
    modal_open: bool,
    deselect_deferred: bool,
}

impl NavigationState {
    pub fn new(today: NaiveDate) -> Self {
        NavigationState {
            date: today,
            selected: None,
            task_count: 0,
            generation: 0,
            modal_open: false,
            deselect_deferred: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn can_go_forward(&self, today: NaiveDate) -> bool {
        self.date < today
    }

    pub fn prev_day(&mut self) {
        self.set_date(self.date - Duration::days(1));
    }

    /// Refused when it would move past `today`.
    pub fn next_day(&mut self, today: NaiveDate) -> bool {
        if !self.can_go_forward(today) {
            return false;
        }
        self.set_date(self.date + Duration::days(1));
        true
    }

    pub fn goto_today(&mut self, today: NaiveDate) {
        if self.date != today {
            self.set_date(today);
        }
    }

    /// Records how many tasks the last render produced and keeps the
    /// selection inside the list.
    pub fn set_task_count(&mut self, count: usize) {
        self.task_count = count;
        self.selected = match (self.selected, count) {
            (_, 0) => None,
            (Some(index), count) => Some(index.min(count - 1)),
            (None, _) => None,
        };
    }

    pub fn select_next(&mut self) -> Option<DeselectTicket> {
        let next = match self.selected {
            None => 0,
            Some(index) => index + 1,
        };
        self.select(next)
    }

    pub fn select_previous(&mut self) -> Option<DeselectTicket> {
        let previous = self.selected.map(|index| index.saturating_sub(1)).unwrap_or(0);
        self.select(previous)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.bump();
    }

    /// Clears the selection when `ticket` belongs to the current selection.
    ///
    /// While a modal is open the deselect is deferred until
    /// [`close_modal`](Self::close_modal). Returns whether anything changed.
    pub fn on_deselect_timeout(&mut self, ticket: DeselectTicket) -> bool {
        if ticket.0 != self.generation || self.selected.is_none() {
            return false;
        }
        if self.modal_open {
            self.deselect_deferred = true;
            return false;
        }
        self.selected = None;
        true
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Returns a fresh ticket when a deselect was deferred by the modal.
    pub fn close_modal(&mut self) -> Option<DeselectTicket> {
        self.modal_open = false;
        if !std::mem::take(&mut self.deselect_deferred) || self.selected.is_none() {
            return None;
        }
        Some(self.bump())
    }

    fn select(&mut self, index: usize) -> Option<DeselectTicket> {
        if self.task_count == 0 {
            return None;
        }
        self.selected = Some(index.min(self.task_count - 1));
        Some(self.bump())
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.clear_selection();
    }

    fn bump(&mut self) -> DeselectTicket {
        self.generation += 1;
        self.deselect_deferred = false;
        DeselectTicket(self.generation)
    }
}
