// Adapters layer: concrete implementations for external systems (http, shop pages, notifications).

pub mod http;
pub mod notify;
pub mod shops;
