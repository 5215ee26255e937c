pub mod client;
pub mod invoice;
pub mod notification;
pub mod quality_check;
pub mod quote;
pub mod vehicle;
pub mod work_order;
