//! Interleaving the task queues of several images.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::DrawTask;

/// How tasks of several images are interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerStrategy {
    /// Finish each image before starting the next
    #[default]
    Sequential,
    /// One task per image in turn
    All,
    /// Always work on the least complete image
    Percentage,
}

impl SchedulerStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerStrategy::Sequential => "SEQUENTIAL",
            SchedulerStrategy::All => "ALL",
            SchedulerStrategy::Percentage => "PERCENTAGE",
        }
    }
}

impl fmt::Display for SchedulerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SEQUENTIAL" => Ok(SchedulerStrategy::Sequential),
            "ALL" => Ok(SchedulerStrategy::All),
            "PERCENTAGE" => Ok(SchedulerStrategy::Percentage),
            _ => Err(format!("unknown scheduler strategy: {}", s)),
        }
    }
}

/// Pending tasks of one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageQueue {
    pub tasks: VecDeque<DrawTask>,
    /// Cells in the image grid, the denominator of its completion
    pub cells: usize,
}

impl ImageQueue {
    pub fn new(tasks: VecDeque<DrawTask>, cells: usize) -> Self {
        Self { tasks, cells }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Share of cells that need no more work, `0.0..=1.0`.
    pub fn completion(&self) -> f64 {
        if self.cells == 0 {
            return 1.0;
        }
        1.0 - self.tasks.len() as f64 / self.cells as f64
    }

    pub fn progress(&self, pixels_per_hour: f64) -> Progress {
        Progress::new(self.cells, self.tasks.len(), pixels_per_hour)
    }
}

/// Picks the next task across image queues.
///
/// Queues may change between calls; every call looks at their current
/// state. `None` means all queues are empty.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    strategy: SchedulerStrategy,
    cursor: usize,
}

impl Scheduler {
    pub fn new(strategy: SchedulerStrategy) -> Self {
        Self {
            strategy,
            cursor: 0,
        }
    }

    pub fn strategy(&self) -> SchedulerStrategy {
        self.strategy
    }

    /// Next task and the index of the queue it came from.
    pub fn next(&mut self, queues: &mut [ImageQueue]) -> Option<(usize, DrawTask)> {
        let index = match self.strategy {
            SchedulerStrategy::Sequential => queues.iter().position(|q| !q.is_empty())?,
            SchedulerStrategy::All => {
                let n = queues.len();
                let index = (0..n)
                    .map(|offset| (self.cursor + offset) % n)
                    .find(|&i| !queues[i].is_empty())?;
                self.cursor = index + 1;
                index
            }
            SchedulerStrategy::Percentage => {
                let mut best: Option<(usize, f64)> = None;
                for (i, queue) in queues.iter().enumerate() {
                    if queue.is_empty() {
                        continue;
                    }
                    let completion = queue.completion();
                    match best {
                        Some((_, lowest)) if completion >= lowest => {}
                        _ => best = Some((i, completion)),
                    }
                }
                best?.0
            }
        };
        let task = queues[index].tasks.pop_front()?;
        Some((index, task))
    }
}

/// Completion figures as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    /// Whole percent, rounded down
    pub percent: u32,
    /// Whole hours until done at the recharge rate, rounded down
    pub eta_hours: u64,
}

impl Progress {
    pub fn new(total: usize, remaining: usize, pixels_per_hour: f64) -> Self {
        let done = total.saturating_sub(remaining);
        let percent = if total == 0 {
            100
        } else {
            (done * 100 / total) as u32
        };
        let eta_hours = if pixels_per_hour > 0.0 {
            (remaining as f64 / pixels_per_hour).floor() as u64
        } else {
            0
        };
        Self {
            done,
            total,
            percent,
            eta_hours,
        }
    }

    /// Combined progress over several queues.
    pub fn overall(queues: &[ImageQueue], pixels_per_hour: f64) -> Self {
        let total = queues.iter().map(|q| q.cells).sum();
        let remaining = queues.iter().map(|q| q.tasks.len()).sum();
        Self::new(total, remaining, pixels_per_hour)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}% ETA: {}h",
            self.done, self.total, self.percent, self.eta_hours
        )
    }
}
