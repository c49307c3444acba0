//! Cross-invocation state for the Tizen packager.
//!
//! The only persisted state is `userconf.json`, which caches the metadata
//! entered on a previous build.

mod userconf;

pub use userconf::{
    CachedMetadata, DEFAULT_USERCONF_PATH, TIZEN_KEY, UserConf, UserConfStore,
};
