//! clearops: customs-brokerage back-office core
//!
//! Tracks shipments through the fixed Guinean import-clearance lifecycle,
//! auto-advances status when documents or payments land, derives dashboard
//! alerts and next steps, and computes duty liquidations. The surrounding
//! web layer plugs in through [`store::ShipmentStore`]; the bundled CLI is a
//! thin operator front-end over the same entry points.

pub mod alerts;
pub mod cli;
pub mod core;
pub mod duty;
pub mod entities;
pub mod extract;
pub mod store;
pub mod workflow;
