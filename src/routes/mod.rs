pub mod client_routes;
pub mod invoice_routes;
pub mod quote_routes;
pub mod vehicle_routes;
pub mod work_order_routes;
