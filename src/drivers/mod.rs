pub mod sim;

#[cfg(feature = "std")]
pub mod host;
