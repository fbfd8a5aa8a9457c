//! Value types shared between the Food Dash engine and server.
mod amount;

pub mod op;

pub use amount::{Amount, AmountConversionError, MAX_AMOUNT_CENTS};
