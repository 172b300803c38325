pub mod outcome;
pub mod waiter;
