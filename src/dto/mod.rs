pub mod client_dto;
pub mod common;
pub mod invoice_dto;
pub mod quote_dto;
pub mod vehicle_dto;
pub mod work_order_dto;
