pub mod advertizer;

pub use advertizer::{Advertisement, Advertizer};
#[cfg(feature = "metrics")]
pub use advertizer::AdvertizerMetrics;
