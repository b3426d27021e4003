pub mod error;

// Contact import and reconciliation
pub mod contact;
