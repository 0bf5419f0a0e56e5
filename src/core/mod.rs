pub mod codec;
pub mod dashboard;
