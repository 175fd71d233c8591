//! Adapters - in-process implementations of the ports.
//!
//! Production deployments swap these for database, gateway, and media
//! service adapters; the application layer never knows the difference.

pub mod discount;
pub mod media;
pub mod payment;
pub mod storage;
