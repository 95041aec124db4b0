//! Shared database access for CopyGuard services

pub mod init;

pub use init::init_database;
