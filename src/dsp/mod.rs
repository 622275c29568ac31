//! Signal processing
//!
//! The processor applies validated strategies; the spectrum module holds
//! the FFT wrapper and the small numeric helpers both sides of the
//! pipeline share.

mod processor;
mod spectrum;

pub use processor::AudioProcessor;
pub use spectrum::{
    db_to_linear, linear_to_db, moving_average, normalize_to_db, percentile, rms, signal_stats,
    Fft, SignalStats, LOG_FLOOR,
};
