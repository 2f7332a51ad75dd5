pub mod authorization;
pub mod merkle;
pub mod proof;
pub mod session;
pub mod transaction;
pub mod whitelist;
pub mod witness;
