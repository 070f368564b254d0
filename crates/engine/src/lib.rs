//! Client-side domain logic for Tally.
//!
//! Nothing in this crate performs I/O. It turns the entry list fetched from the
//! API into the figures the screens display ([`aggregate`]), turns form input
//! into typed payloads ([`form`]), and decides whether a stored login token is
//! still usable ([`session`]).

pub use currency::Currency;
pub use error::EngineError;
pub use money::MoneyCents;

pub mod aggregate;
pub mod form;
pub mod session;

mod currency;
mod error;
mod money;

pub type ResultEngine<T> = Result<T, EngineError>;
