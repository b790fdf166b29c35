pub mod kv;

pub use kv::SqliteStorage;
