//! # Common Types

use compact_str::CompactString;

/// One unit of a chain: an escaped symbol, or an already assembled sub-expression.
///
/// Nearly all symbols are one or two bytes, so these live inline.
pub type Atom = CompactString;

/// A sequence of [`Atom`]s still to be folded into a pattern.
pub type Chain = Vec<Atom>;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type PWHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> PWHashMap<K, V> {
            PWHashMap::new()
        }
    } else if #[cfg(feature = "foldhash")] {
        /// Type Alias for hash maps in this crate.
        pub type PWHashMap<K, V> = foldhash::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> PWHashMap<K, V> {
            foldhash::HashMapExt::new()
        }
    } else {
        /// Type Alias for hash maps in this crate.
        pub type PWHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> PWHashMap<K, V> {
            PWHashMap::new()
        }
    }
}
