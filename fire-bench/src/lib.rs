//! Size and throughput measurement of a trained detector, and the
//! validation driver around the external detection framework.

mod common;
pub mod detector;
pub mod driver;
pub mod external;
pub mod metrics;
pub mod size;
pub mod summary;
pub mod timer;
#[cfg(feature = "tch")]
pub mod torch;
pub mod validate;
pub mod weights;

pub use detector::*;
pub use driver::*;
pub use external::*;
pub use metrics::*;
pub use size::*;
pub use summary::*;
pub use timer::*;
#[cfg(feature = "tch")]
pub use torch::*;
pub use validate::*;
pub use weights::*;
