//! Command implementations

mod context;
mod reconcile;
mod serve;

pub use reconcile::{ReconcileOptions, run_reconcile};
pub use serve::{ServeOptions, run_serve};
