// Taskgate SQLite Adapter
//
// Implements the QueueRegistry and QueueHandle ports on top of sqlx/SQLite.

mod connection;
mod error;
mod migration;
mod queue;
mod queue_registry;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use queue::SqliteQueue;
pub use queue_registry::SqliteQueueRegistry;
