//! Daily status update workflow: classify free-form technician update
//! lines, aggregate them into a structured report, and hand the result to
//! the email/chart/persistence collaborators.

pub mod classifier;
pub mod history;
pub mod render;
pub mod report;

pub use classifier::{classify, Disposition, LineClass};
pub use history::{append_task_metrics, write_snapshot, HistoryError, ReportSnapshot};
pub use report::{DailyReport, TaskCount, TechnicianActivity};
