// Accessibility Scan API - Core
//
// This crate provides the backend for scanning a website for accessibility
// issues: it audits the homepage and a few relevant subpages through an
// external Lighthouse capability, classifies findings against WCAG, and
// returns a severity-ranked report.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
