//! Signal generation over a sandboxed equation evaluator.
//!
//! A [`Signal`] binds a [`ParameterSet`](catalog::ParameterSet) and an
//! equation to the series the [`SignalGenerator`] computes for them. Signals
//! live in a [`SignalLibrary`]; both announce changes through synchronous
//! [`Subscribers`].

pub mod export;
pub mod generator;
pub mod library;
pub mod observer;
pub mod palette;
pub mod settings;
pub mod signal;

pub use generator::{
    generate_signal_data, time_grid, GenerateError, SignalGenerator, TimeSeries,
    NUMERIC_MODULE_IDENT, PHASE_RAD_IDENT, TIME_IDENT,
};
pub use library::{LibraryError, LibraryEvent, SignalLibrary};
pub use observer::{Subscribers, SubscriptionId};
pub use palette::{ColorCursor, PaletteError, Rgb, DEFAULT_PALETTE};
pub use signal::{Signal, SignalChange, SignalFactory, SignalRef};
