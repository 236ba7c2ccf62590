//! Serializers for assembled reports.
//!
//! Only JSON-LD ([`jsonld`]) is produced; it is the format report viewers
//! and the HTML report templates consume.

pub mod jsonld;
