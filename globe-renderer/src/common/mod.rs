pub mod arc;
pub mod projection;
pub mod rotation;
pub mod versor;
