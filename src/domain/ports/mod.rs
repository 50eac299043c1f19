mod auth_port;
mod data_port;
#[cfg(test)]
mod in_memory;
mod query;
mod session_storage_port;

pub use auth_port::AuthPort;
pub use data_port::{DataPort, Record, decode_rows};
pub use query::{Embed, Filter, FilterOp, Order, Query, Table, compare_cells};
pub use session_storage_port::SessionStoragePort;

#[cfg(test)]
pub mod mocks {
    pub use super::auth_port::MockAuthPort;
    pub use super::in_memory::{InMemoryDataPort, Operation};
    pub use super::session_storage_port::mock::MockSessionStorage;
}
