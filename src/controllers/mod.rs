pub mod client_controller;
pub mod invoice_controller;
pub mod quote_controller;
pub mod vehicle_controller;
pub mod work_order_controller;
