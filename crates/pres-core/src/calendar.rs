//! Slot calendar construction.
//!
//! Picks the presentation dates from observed participant availability and
//! expands them into the ordered list of (date, period) slots that every room
//! shares.
//!
//! # Date Selection
//!
//! 1. Count, per date, how many distinct participants are available on it
//!    (any period), remembering the order in which dates were first seen.
//! 2. Dates reaching the coverage threshold qualify. If at least `D` qualify,
//!    the first `D` of them (in first-seen order) are selected.
//! 3. Otherwise the `D` most frequent dates are selected, ties going to the
//!    date seen first.
//! 4. Selected dates are sorted chronologically; slots are date-major,
//!    period-minor in configured period order.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::SEATS_PER_CELL;
use crate::error::ScheduleError;
use crate::types::{Participant, PeriodId, Slot};

/// Participant count observed for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateFrequency {
    pub date: NaiveDate,
    pub participants: usize,
}

/// The usable (date, period) universe for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCalendar {
    /// Every observed date, in first-seen order.
    date_frequency: Vec<DateFrequency>,
    /// Distinct participants per (date, period).
    slot_frequency: HashMap<Slot, usize>,
    /// Selected dates, chronological.
    dates: Vec<NaiveDate>,
    periods: Vec<PeriodId>,
    slots: Vec<Slot>,
    participant_count: usize,
}

impl SlotCalendar {
    /// Builds the calendar from participant availability.
    ///
    /// `coverage_threshold` is a percentage of all participants.
    pub fn build(
        participants: &[Participant],
        periods: &[PeriodId],
        number_of_days: usize,
        coverage_threshold: u8,
    ) -> Self {
        let mut date_frequency: Vec<DateFrequency> = Vec::new();
        let mut date_index: HashMap<NaiveDate, usize> = HashMap::new();
        let mut slot_frequency: HashMap<Slot, usize> = HashMap::new();

        for participant in participants {
            let mut seen_dates = HashSet::new();
            let mut seen_slots = HashSet::new();

            for slot in &participant.availability {
                if seen_slots.insert(slot) {
                    *slot_frequency.entry(slot.clone()).or_insert(0) += 1;
                }
                if !seen_dates.insert(slot.date) {
                    continue;
                }
                let index = *date_index.entry(slot.date).or_insert_with(|| {
                    date_frequency.push(DateFrequency {
                        date: slot.date,
                        participants: 0,
                    });
                    date_frequency.len() - 1
                });
                date_frequency[index].participants += 1;
            }
        }

        let dates = select_dates(
            &date_frequency,
            participants.len(),
            number_of_days,
            coverage_threshold,
        );

        let slots = dates
            .iter()
            .flat_map(|date| {
                periods
                    .iter()
                    .map(move |period| Slot::new(*date, period.clone()))
            })
            .collect();

        tracing::debug!(
            observed_dates = date_frequency.len(),
            selected = ?dates,
            "built slot calendar"
        );

        Self {
            date_frequency,
            slot_frequency,
            dates,
            periods: periods.to_vec(),
            slots,
            participant_count: participants.len(),
        }
    }

    /// Selected dates in chronological order.
    pub fn selected_dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Configured periods in schedule order.
    pub fn periods(&self) -> &[PeriodId] {
        &self.periods
    }

    /// All slots in calendar order (date outer, period inner).
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Observed dates with their participant counts, in first-seen order.
    pub fn date_frequency(&self) -> &[DateFrequency] {
        &self.date_frequency
    }

    /// Number of distinct participants available in the given slot.
    pub fn slot_frequency(&self, slot: &Slot) -> usize {
        self.slot_frequency.get(slot).copied().unwrap_or(0)
    }

    /// Position of a slot in calendar order, if it is part of the calendar.
    pub fn slot_index(&self, date: NaiveDate, period: &PeriodId) -> Option<usize> {
        let date_pos = self.dates.binary_search(&date).ok()?;
        let period_pos = self.periods.iter().position(|p| p == period)?;
        Some(date_pos * self.periods.len() + period_pos)
    }

    /// Seats available in a single room across the whole calendar.
    pub fn room_capacity(&self) -> usize {
        self.slots.len() * SEATS_PER_CELL
    }

    /// Fails when the rooms cannot seat every participant.
    pub fn check_capacity(&self, room_count: usize) -> Result<(), ScheduleError> {
        let capacity = self.room_capacity() * room_count;
        if capacity < self.participant_count {
            return Err(ScheduleError::InsufficientCapacity {
                capacity,
                participants: self.participant_count,
            });
        }
        Ok(())
    }
}

fn select_dates(
    date_frequency: &[DateFrequency],
    total_participants: usize,
    number_of_days: usize,
    coverage_threshold: u8,
) -> Vec<NaiveDate> {
    let threshold = usize::from(coverage_threshold);
    let qualifying: Vec<NaiveDate> = date_frequency
        .iter()
        .filter(|f| f.participants * 100 >= threshold * total_participants)
        .map(|f| f.date)
        .collect();

    let mut selected: Vec<NaiveDate> = if qualifying.len() >= number_of_days {
        qualifying.into_iter().take(number_of_days).collect()
    } else {
        tracing::debug!(
            qualifying = qualifying.len(),
            requested = number_of_days,
            "too few dates meet the coverage threshold, ranking by frequency"
        );
        let mut ranked = date_frequency.to_vec();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.participants.cmp(&a.participants));
        ranked
            .into_iter()
            .take(number_of_days)
            .map(|f| f.date)
            .collect()
    };

    selected.sort_unstable();
    selected
}
