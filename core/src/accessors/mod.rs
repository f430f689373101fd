//! accessors/mod.rs
//! Typed access to a `TagIndex`: reads with locale resolution, writes,
//! translations and tag copying.

pub mod get;
pub mod i18n;
pub mod locale;
pub mod update;

pub use get::{EntryRef, HeaderItem};
pub use locale::{locale_candidates, locale_matches, select_locale};
pub use update::copy_tags;
