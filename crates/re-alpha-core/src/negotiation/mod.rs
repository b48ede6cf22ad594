pub mod leverage;

pub use leverage::negotiation_leverage;
