pub mod backend;
mod logging;
pub mod math;
pub mod sim;
pub mod world;

/// Installs the crate's logger.
///
/// Safe to call more than once; later calls are ignored if a logger is
/// already set (e.g. by the embedding application).
pub fn init() {
    let _ = logging::try_init();
}
