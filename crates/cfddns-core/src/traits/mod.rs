//! Core traits for cfddns
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`DnsProvider`]: Locate and update a DNS record via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, RecordId, RecordUpdate};
