//! Shipment workflow: trigger tables, the advance engine, next steps

pub mod engine;
pub mod next_steps;
pub mod triggers;

pub use engine::{AdvanceOutcome, SkipReason, WorkflowEngine};
pub use next_steps::{next_steps, NextStep, NextStepAction, Priority};
pub use triggers::{document_target, expense_target};
