// storage/mod.rs
// Database operations module

pub mod address;
pub mod labels;
pub mod migrations;
pub mod nodes;
pub mod pool;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use address::{count_addresses, fetch_address, fetch_address_by_raw, load_components};
pub use labels::{address_labels, node_label};
pub use migrations::run_migrations;
pub use nodes::{count_nodes, fetch_node};
pub use pool::init_db_pool_with_path;
