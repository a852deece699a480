//! Schedule module - Recruiting deadline and cancellation window rules.

mod deadline;

pub use deadline::{
    CancellationWindow, DeadlinePolicy, DEFAULT_DEADLINE_LEAD_DAYS, MAX_DEADLINE_LEAD_DAYS,
};
