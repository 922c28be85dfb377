//! Adapters for the two host-owned stores an input depends on: the
//! checkpoint store and the account credential store.

pub mod account;
pub mod checkpoint;
