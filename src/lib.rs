//! Yield-style generators backed by one thread per sequence.
//!
//! A [`Producer`] pushes values out through a [`Yielder`] whenever it sees
//! fit; a consumer pulls them one at a time through a [`Cursor`], which is a
//! plain [`Iterator`]. Each iteration runs the producer on a dedicated
//! thread, which is parked inside every [`yield_`][`Yielder::yield_`] until
//! the consumer asks for the next value: the two sides strictly alternate,
//! so values are never reordered, duplicated, or computed ahead of demand.
//!
//! ```rust
//! use ::thread_gen::prelude::*;
//!
//! #[generator(yield(u32))]
//! fn countdown (from: u32)
//! {
//!     let mut current = from;
//!     while current > 0 {
//!         yield_!(current);
//!         current -= 1;
//!     }
//! }
//!
//! let values: Vec<u32> =
//!     countdown(3)
//!         .iter()
//!         .collect::<Result<_, _>>()
//!         .unwrap()
//! ;
//! assert_eq!(values, [3, 2, 1]);
//! ```
//!
//! Producers may fail, in which case the consumer gets every value yielded
//! before the failure, then the error:
//!
//! ```rust
//! use ::thread_gen::prelude::*;
//!
//! #[generator(yield(u8))]
//! fn parse_digits (input: &'static str)
//!   -> Result<(), char>
//! {
//!     for c in input.chars() {
//!         yield_!(c.to_digit(10).ok_or(c)? as u8);
//!     }
//!     Ok(())
//! }
//!
//! let mut cursor = parse_digits("12x3").iter();
//! assert_eq!(cursor.next_value().unwrap(), 1);
//! assert_eq!(cursor.next_value().unwrap(), 2);
//! assert_eq!(cursor.next_value().unwrap_err().into_failure(), Some('x'));
//! assert!(cursor.next_value().unwrap_err().is_exhausted());
//! ```
//!
//! Dropping (or [`close`][`Cursor::close`]-ing) a cursor half-way cancels the
//! producer at the yield it is parked on and joins its thread.

#![warn(
    future_incompatible,
    rust_2018_compatibility,
    missing_docs,
    clippy::cargo,
    clippy::pedantic,
)]
#![deny(
    unused_must_use,
)]

#[macro_use]
mod utils;

pub
mod prelude;

mod public_macros;

mod config;
mod cursor;
mod error;
mod generator;
mod producer;
mod runner;

pub use self::{
    config::Builder,
    cursor::Cursor,
    error::{
        Cancelled,
        GeneratorError,
    },
    generator::Generator,
    producer::{
        from_fn,
        FromFn,
        Producer,
    },
    runner::{
        RunState,
        Yielder,
    },
};

#[cfg(feature = "macros")]
pub use ::thread_gen_proc_macros::generator;

#[doc(hidden)] /** Not part of the public API */ pub
mod __ {
    pub use {
        ::core,
        crate::producer::ProducerResult,
    };
}

#[cfg(test)]
mod tests;
