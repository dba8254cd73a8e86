//! Cloud Sync Module - Publishing readings to the remote table
//!
//! This module handles:
//! - Building the enriched reading record (synthetic vitals, IST timestamp)
//! - Inserting it into the Supabase table over PostgREST

pub mod client;
pub mod record;

pub use client::{PublishError, ReadingSink, SupabaseClient};
pub use record::{to_ist, ReadingRecord, VitalSigns};
