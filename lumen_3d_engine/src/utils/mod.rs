/// Small general-purpose containers

mod lru_cache;

pub use lru_cache::LruCache;
