pub mod csv;
pub mod layout;
pub mod mapping;
pub mod template;
