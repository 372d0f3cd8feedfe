//! Infrastructure layer - External service implementations

pub mod cache;
pub mod dominio;
pub mod logging;
pub mod storage;
pub mod transfer;
