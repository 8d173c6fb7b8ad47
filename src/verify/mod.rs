pub mod parity;
pub mod tolerance;
