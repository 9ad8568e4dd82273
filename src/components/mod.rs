pub mod dashboard;
pub mod forecast_list;
pub mod icons;
pub mod instrument_cluster;
pub mod location_header;
pub mod search_overlay;
pub mod temperature_gauge;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use dashboard::{Dashboard, DashboardProps, ERROR_ICON};
pub use forecast_list::{ForecastList, ForecastListProps};
pub use instrument_cluster::{InstrumentCluster, InstrumentClusterProps};
pub use location_header::{LocationHeader, LocationHeaderProps};
pub use search_overlay::{SearchOverlay, SearchOverlayProps};
pub use temperature_gauge::{TemperatureGauge, TemperatureGaugeProps};
