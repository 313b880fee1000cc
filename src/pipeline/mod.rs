pub mod classify;
pub mod extract;
pub mod ramp;

pub use classify::{classify, Classification};
pub use extract::{extract_colors, unique};
pub use ramp::{generate_ramp, Ramp, DEFAULT_VARIATIONS};
