mod road;

pub use road::*;
