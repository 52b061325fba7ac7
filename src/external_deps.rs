pub use chrono::{DateTime, Local, TimeZone, Utc};
pub use deadpool_tiberius::{Manager, Pool};
pub use flexi_logger::{Age, Cleanup, Criterion, DeferredNow, FileSpec, Logger, Naming, Record};
pub use once_cell::sync::Lazy as once_lazy;
pub use reqwest::Client;
pub use tiberius::{ColumnData, Row};
pub use urlencoding::encode;
