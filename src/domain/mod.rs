//! Domain logic - pure release rules independent of git and the filesystem layout

pub mod branch;
pub mod package;
pub mod tag;
pub mod version;

pub use branch::{proxy_branch, PackagingSystem};
pub use package::Package;
pub use tag::TagPattern;
pub use version::{BumpUnit, Version, VERSION_PATTERN};
