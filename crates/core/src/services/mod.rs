pub mod alert_service;
pub mod kpi_service;
pub mod normalize_service;
pub mod planning_service;
pub mod prediction_service;
pub mod publish_service;
pub mod signal_service;
pub mod snapshot_service;
