pub mod batch;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod invoice;
pub mod locator;
pub mod sink;
pub mod table;
#[cfg(test)]
mod testutil;
mod textutil;
