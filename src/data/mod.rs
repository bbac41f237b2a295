pub mod encoder;
pub mod preprocessing;
pub mod schema;
