pub mod envelope;
pub mod error;
pub mod features;
pub mod unpack;
