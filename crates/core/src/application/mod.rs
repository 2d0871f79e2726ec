// Application Layer - Use Cases and Business Logic

pub mod listing;

// Re-exports
pub use listing::JobService;
