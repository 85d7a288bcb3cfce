//! Search input adapters.

mod debouncer;

pub use debouncer::{DEFAULT_QUIET_PERIOD, SearchDebouncer};
