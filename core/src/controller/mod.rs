//! UI-facing state containers over the resource services.
//!
//! # Design
//! A controller owns its state and a service handle. Views read state
//! through accessors and forward user actions to controller methods; the
//! controller calls the service and reconciles the outcome into its state.
//! Failures are kept as display strings in `error`. Mutating operations
//! also hand the error back to the caller.
//!
//! Operations that can race (list loads, searches, per-entry updates) are
//! split into `begin_*` and `complete_*` halves joined by a generation
//! ticket. The one-shot methods (`fetch`, `search`, `update`) just run both
//! halves around the service call. A binding that runs the service call
//! elsewhere uses the halves directly: a completion whose ticket has been
//! superseded, or invalidated by `cancel_pending`, is discarded.

pub mod list;
pub mod operation;
pub mod record;
pub mod session;

pub use list::{FetchTicket, ListController, ListState, SearchTicket, UpdateTicket};
pub use operation::Operation;
pub use record::{RecordController, RecordState};
pub use session::SessionController;

/// How a list controller reconciles successful create/update/delete calls.
///
/// The same policy applies to all three operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Refetch the current page with the last-used parameters.
    #[default]
    Resync,
    /// Patch the local list in place: append on create, replace by id on
    /// update, remove by id on delete. `pagination.total` is adjusted by one.
    LocalPatch,
}
