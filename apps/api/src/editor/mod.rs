pub mod assist;
pub mod document;
pub mod handlers;
pub mod session;
