// Scrapeflow Infrastructure - Queue Adapter
// Implements: WorkQueue over a Redis list per topic

pub mod redis_queue;

pub use redis_queue::RedisWorkQueue;
