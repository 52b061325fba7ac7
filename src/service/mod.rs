pub mod chart_service_impl;
pub mod query_service_impl;
pub mod report_service_impl;
pub mod resolve_service_impl;
pub mod series_service_impl;
