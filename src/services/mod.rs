pub mod notification_service;
pub mod progress_service;
pub mod quality_service;
pub mod quote_service;
pub mod stage_service;
