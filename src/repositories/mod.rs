pub mod client_repository;
pub mod invoice_repository;
pub mod notification_repository;
pub mod quote_repository;
pub mod vehicle_repository;
pub mod work_order_repository;
