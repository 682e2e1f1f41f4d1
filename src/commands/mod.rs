/// `config`: print the effective configuration
pub mod config;
/// `init`: write a default configuration
pub mod init;
/// `status`: classify every file without acting
pub mod status;
/// `sync`: run one pass
pub mod sync;
