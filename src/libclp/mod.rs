pub mod loader;
pub mod parser;
pub mod question;
pub mod report;
pub mod session;
