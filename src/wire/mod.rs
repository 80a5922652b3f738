//! Request/response contract exchanged with the hosting service.

pub mod request;
pub mod response;
