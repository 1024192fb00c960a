pub mod http_gateway;
pub mod store_gateway;
