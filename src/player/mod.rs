pub mod implementations;
pub mod session;
pub mod traits;
