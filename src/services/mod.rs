//! Service layer: the polling pipeline's business logic.

pub mod coordinator;
pub mod filter;
pub mod formatter;
pub mod normalizer;

pub use coordinator::PollingCoordinator;
pub use filter::OrderFilter;
pub use formatter::MessageFormatter;
pub use normalizer::OrderNormalizer;
