//! Pipeline orchestration: sessions, runs, and run exclusion.

mod config;
mod guard;
mod reconciler;
mod session;

pub use config::ReconcileConfig;
pub use guard::CancelToken;
pub use reconciler::{Reconciler, RunHandle, RunInputs, RunResult, RunSummary};
pub use session::{Session, Stage};
