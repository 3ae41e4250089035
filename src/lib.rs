//! Regulations question answering: a gateway in front of a retrieval service
//! and a generation service.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
