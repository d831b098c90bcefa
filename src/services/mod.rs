// Service module exports

pub mod recurrence;
pub mod settings;
