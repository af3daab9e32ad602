use chrono::NaiveDate;

use crate::{Name, ReadError, WriteError};

pub const CYCLE_WEEKS: u32 = 8;
pub const DEFAULT_WORKOUTS_GOAL: u32 = 40;

pub trait CycleRepository {
    fn read_cycle(&self) -> Result<Option<Cycle>, ReadError>;
    /// Stores the cycle, or removes the stored cycle if `None` is given.
    fn write_cycle(&self, cycle: Option<&Cycle>) -> Result<(), WriteError>;
}

pub trait CycleService {
    fn get_cycle(&self) -> Option<Cycle>;
    /// Replaces any existing cycle.
    fn start_cycle(&self, cycle: Cycle) -> Cycle;
    fn record_workout(&self) -> Option<Cycle>;
    fn update_body_weight(&self, weight: f32) -> Option<Cycle>;
    fn add_cycle_note(&self, date: NaiveDate, text: &str) -> Option<Cycle>;
    fn add_highlight(&self, highlight: &str) -> Option<Cycle>;
    fn end_cycle(&self);
}

/// Bulk cycle spanning several weeks of training.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub name: Name,
    pub start_date: NaiveDate,
    pub starting_weight: f32,
    pub current_weight: f32,
    pub goal_weight: Option<f32>,
    pub workouts_goal: u32,
    pub workouts_completed: u32,
    pub notes: Vec<CycleNote>,
    pub stats: CycleStats,
}

impl Cycle {
    #[must_use]
    pub fn new(
        name: Name,
        start_date: NaiveDate,
        starting_weight: f32,
        goal_weight: Option<f32>,
        workouts_goal: u32,
    ) -> Self {
        Self {
            name,
            start_date,
            starting_weight,
            current_weight: starting_weight,
            goal_weight,
            workouts_goal,
            workouts_completed: 0,
            notes: vec![],
            stats: CycleStats::default(),
        }
    }

    /// One-based week number of `today`. Days before the start count as the first week.
    #[must_use]
    pub fn week(&self, today: NaiveDate) -> u32 {
        let days = (today - self.start_date).num_days().max(0);
        u32::try_from(days / 7).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Full weeks left after the week of `today`.
    #[must_use]
    pub fn weeks_remaining(&self, today: NaiveDate) -> u32 {
        CYCLE_WEEKS.saturating_sub(self.week(today))
    }

    #[must_use]
    pub fn is_complete(&self, today: NaiveDate) -> bool {
        self.week(today) > CYCLE_WEEKS
    }

    /// Completed workouts in percent of the goal, or `None` if no goal is set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> Option<f32> {
        if self.workouts_goal == 0 {
            return None;
        }
        Some(self.workouts_completed as f32 / self.workouts_goal as f32 * 100.0)
    }

    #[must_use]
    pub fn weight_change(&self) -> f32 {
        self.current_weight - self.starting_weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleNote {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    pub personal_records: Vec<String>,
}
