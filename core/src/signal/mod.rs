pub mod diagnostics;
pub mod sonar;
pub mod weather;

pub use diagnostics::{DiagnosticsMonitor, DiagnosticsReading};
pub use sonar::{EchoSource, SimulatedEcho};
pub use weather::{WeatherReading, WeatherStation};
