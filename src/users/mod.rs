pub mod file;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use file::FileUserStore;
#[cfg(test)]
pub use memory::MemoryUserStore;
pub use store::{NewUser, RegisterError, RemoveError, Role, UserStore};
