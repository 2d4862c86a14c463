pub mod feed;
pub mod item;
pub mod snapshot;

pub use feed::FeedConfig;
pub use item::{Identity, Item, RawItem, UNIDENTIFIED_GUID};
pub use snapshot::Snapshot;
