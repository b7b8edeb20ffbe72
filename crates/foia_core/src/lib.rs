//! Lifecycle engine for FOIA requests: response deadlines, status changes,
//! dashboard metrics and search over a snapshot of request records.
//!
//! Everything here is a pure function of its inputs. Callers pass `today`
//! explicitly so that one computation sees one date.

pub mod dates;
pub mod deadline;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod metrics;
pub mod schema;
pub mod snapshot;
pub mod windows;

pub use deadline::{add_business_days, compute_deadline};
pub use error::{LifecycleError, Validated, ValidationWarning};
pub use filter::{filter, Selection};
pub use lifecycle::{
    apply_update, create_request, derive, recompute_deadline, transition, visible_fields,
    Derived, FieldVisibility, RequestUpdate, StatusCategory,
};
pub use metrics::{compute_metrics, Metrics, StatusCount};
pub use schema::{AgencyType, AppealStatus, NewRequest, Priority, Request, Status};
pub use windows::ResponseWindows;
