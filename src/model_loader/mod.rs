pub mod impl_fake;
pub mod impl_remote;
pub mod interface;
pub mod metadata;
