pub mod admission;
pub mod logging;

pub use admission::admission_control;
pub use logging::{request_logger, REQUEST_ID_HEADER};
