//! # Double Hash Map
//!
//! A Rust implementation of an open-addressed string hash table with double
//! hashing and prime-sized capacities.
//!
//! The table maps owned `String` keys to `String` values. Collisions are
//! resolved by probing: two independent polynomial hashes of the key give a
//! home slot and a step, and with a prime slot count the resulting chain
//! visits every slot before repeating. Removed entries leave tombstones so
//! chains stay intact, and the table resizes itself to keep the load factor
//! between 10% and 70%, compacting tombstones away on every resize.
//!
//! ## Basic Usage
//!
//! ```rust
//! use doublehash::DoubleHashMap;
//!
//! // Create a new table
//! let mut map = DoubleHashMap::new();
//!
//! // Insert values
//! map.insert("apple".to_string(), "fruit".to_string());
//! map.insert("carrot".to_string(), "vegetable".to_string());
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some("fruit"));
//!
//! // Update values; the old value is handed back
//! let old = map.insert("apple".to_string(), "pome".to_string());
//! assert_eq!(old, Some("fruit".to_string()));
//! assert_eq!(map.get("apple"), Some("pome"));
//!
//! // Remove values
//! assert_eq!(map.remove("apple"), Some("pome".to_string()));
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Resizing
//!
//! ```rust
//! use doublehash::DoubleHashMap;
//!
//! let mut map = DoubleHashMap::new();
//! assert_eq!(map.capacity(), 53);
//!
//! // Pushing the load factor past 70% doubles the base capacity and rounds
//! // it up to the next prime
//! for i in 0..38 {
//!     map.insert(format!("key-{i}"), format!("value-{i}"));
//! }
//! assert_eq!(map.capacity(), 107);
//!
//! // Every entry survives the rehash
//! assert_eq!(map.get("key-0"), Some("value-0"));
//! assert_eq!(map.len(), 38);
//! ```

/// Module implementing the open-addressed hash table with double hashing
mod double_hashmap;
/// Module providing the primality helpers that size the slot array
pub mod prime;
/// Utility functions and traits for the hash table
mod utils;

pub use double_hashmap::{DoubleHashMap, Iter};
pub use utils::TableExtensions;
