pub mod projection;
pub mod roster_ops;
pub mod validate;
