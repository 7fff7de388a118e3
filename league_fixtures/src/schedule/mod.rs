//! League and group-stage scheduling.
//!
//! [`RoundRobinScheduler`] produces one circle-method leg, [`mirror_leg`]
//! derives the reverse leg and [`GroupPartitioner`] splits a roster into
//! groups that are each scheduled as an independent round robin.

pub mod balance;
pub mod groups;
pub mod mirror;
pub mod round_robin;

pub use balance::HomeAwayBalance;
pub use groups::{Group, GroupAssignmentMode, GroupPartitioner, GroupStage, group_label, team_groups};
pub use mirror::mirror_leg;
pub use round_robin::{LegSchedule, RoundRobinScheduler};
