//! Passive discovery sources: each module queries one third-party index
//! and maps its payload onto [`subscope_common::record::SubdomainRecord`].

pub mod alienvault;
pub mod archiveorg;
pub mod hackertarget;
pub mod leakix;
pub mod rapiddns;
pub mod urlscan;
