// Business domains
pub mod auditing;
pub mod crawling;
pub mod scans;
pub mod waitlist;
