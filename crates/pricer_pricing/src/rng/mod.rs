//! # Random Number Generation Infrastructure
//!
//! Random number generation for the Monte Carlo engine.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator is seeded explicitly; an unseeded
//!   run draws one master seed from entropy and proceeds exactly like a
//!   seeded one
//! - **Stream splitting**: [`derive_stream_seed`] turns one master seed into
//!   independent per-block seeds, so blocks of paths can run on any thread
//!   without changing the result
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut block0 = PricerRng::for_stream(7, 0);
//! let mut block1 = PricerRng::for_stream(7, 1);
//! assert_ne!(block0.seed(), block1.seed());
//!
//! assert_ne!(block0.gen_normal(), block1.gen_normal());
//! ```

mod prng;

pub use prng::{derive_stream_seed, entropy_seed, PricerRng};
