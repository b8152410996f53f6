//! Types for communication between the server and its clients.

pub mod request;
pub mod response;

pub const API_NAME: &str = "PostcodeJP API";
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Every route of the API, relative to the API root.
pub const ENDPOINTS: [&str; 11] = [
    "GET /postal-codes/{postalCode}",
    "GET /postal-codes/search?q=...",
    "GET /prefectures",
    "GET /prefectures/{code}/cities",
    "GET /cities/{code}/postal-codes",
    "GET /offices/{postalCode}",
    "GET /offices/search?q=...",
    "GET /offices/prefecture/{prefecture}",
    "GET /stats",
    "GET /counter",
    "GET /",
];
