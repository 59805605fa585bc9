pub mod clock;
pub mod error;
pub mod policy;
pub mod reconcile;
pub mod roster;
pub mod state_machine;
