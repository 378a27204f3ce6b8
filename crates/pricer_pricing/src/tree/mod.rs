//! Recombining lattice pricers.
//!
//! - [`binomial`]: Cox-Ross-Rubinstein tree with European or American exercise

pub mod binomial;

pub use binomial::{binomial_price, BinomialTreePricer, LatticeConfig, MAX_TREE_STEPS};
