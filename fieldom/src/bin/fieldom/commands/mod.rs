pub mod doc;
pub mod init;
pub mod schema;
