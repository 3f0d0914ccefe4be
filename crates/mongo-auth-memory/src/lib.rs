// mongo-auth-memory — in-memory document store for mongo-auth providers.
//
// Keeps collections in a HashMap for fast, ephemeral storage.
// Meant for tests, prototyping, and development.

pub mod store;

pub use store::MemoryStore;
