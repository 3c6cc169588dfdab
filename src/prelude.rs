pub use crate::ds::{IndexedMinHeap, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::policy::AdvertizerMetrics;
pub use crate::policy::{Advertisement, Advertizer};
