// This module groups time card domain components in 2018 style.
//
// Structure
// - id.rs: identifiers for time cards and breaks
// - state.rs: lifecycle states and their derivation rule
// - errors.rs: transition rejections
// - work_break.rs: a single pause interval
// - entity.rs: the time card aggregate and its state machine
// - interest.rs: listener interests and the matching rule
// - record.rs: plain value form used for storage and rehydration

pub mod entity;
pub mod errors;
pub mod id;
pub mod interest;
pub mod record;
pub mod state;
pub mod work_break;
