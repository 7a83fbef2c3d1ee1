pub mod chat;
pub mod keys;
pub mod personas;
pub mod tasks;
pub mod usage;
