pub mod release;
pub mod update;

pub use release::{NewRelease, Releases};
pub use update::{Decision, Updates};
