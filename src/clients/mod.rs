//! Read-only HTTP clients for the three Polymarket backend services

mod clob;
mod data;
mod gamma;

pub use clob::{ClobClient, PriceHistoryQuery};
pub use data::{ActivityQuery, DataClient, PositionsQuery, TradesQuery};
pub use gamma::{EventsQuery, GammaClient, MarketsQuery};
