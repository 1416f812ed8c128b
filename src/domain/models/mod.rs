pub mod config;
pub mod credential;
pub mod message;
pub mod order;
pub mod stats;

pub use config::{Config, LoggingConfig};
pub use credential::CredentialRecord;
pub use message::{Block, Element, TextObject};
pub use order::{
    Amount, FlatOrder, GraphMoney, GraphOrder, LineItemConnection, OrderIdent, OrderSummary,
    RawOrder, ShapeError, TopItem,
};
pub use stats::RunStats;
