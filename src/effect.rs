//! Effects - side effects declared by the reducer

use crate::forecast::AggregatorOptions;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fetch current conditions and forecast for `city`, tagged with the
    /// generation that requested it
    FetchWeather {
        city: String,
        generation: u64,
        options: AggregatorOptions,
    },
}
