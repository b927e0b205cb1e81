pub mod gather;
pub mod init_config;
pub mod summary;
