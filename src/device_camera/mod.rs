pub mod impl_fake;
#[cfg(feature = "camera")]
pub mod impl_nokhwa;
pub mod interface;
