pub mod payload;

pub use payload::Validated;
