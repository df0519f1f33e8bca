//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod backend;
pub mod probe;
pub mod staging;

pub use backend::*;
pub use probe::*;
pub use staging::*;
