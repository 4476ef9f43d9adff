mod config;
mod favorites;
mod profile;

pub use self::config::{GitlabCliConfig, StoredProfile};
pub use self::favorites::{FavoriteProjectRecord, favorite_key};
pub use self::profile::{CliOverrides, ResolveOptions, ResolvedProfile};
