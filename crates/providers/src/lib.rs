//! Model client implementations for Storyloom.
//!
//! All clients implement the `storyloom_core::ModelClient` trait. The rest of
//! the system never learns about HTTP, retries, or SSE framing.

pub mod deepseek;
pub mod mock;

pub use deepseek::DeepSeekClient;
pub use mock::MockClient;
