//! Activity reports.

pub mod model;

pub use model::{
    Activity, ActivityFilters, ActivityPatch, ActivityStatus, ActivityType, Evidence, NewActivity,
    StatusBreakdown, Tag, UserRef,
};
