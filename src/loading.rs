//! Dynamic loading of shared-object modules.
//!
//! This module turns a batch of shared-object paths into committed or
//! abandoned registrations. The loading process, per path:
//!
//! 1. Opens the unit with eager symbol resolution (no lazy binding; modules
//!    are expected to be self-contained)
//! 2. Resolves and invokes the unit's exported registration hook, which
//!    stages a (subsystem, module) pair into the open [`Session`]
//! 3. Commits the stage (handing over the library keep-alive) on success, or
//!    abandons it when the open failed
//!
//! One [`Session`] scopes the whole batch. Failures are collected and
//! reported through [`PartialSuccess`]; they never abort the batch and are
//! never retried.
//!
//! [`Session`]: crate::Session
//! [`PartialSuccess`]: crate::PartialSuccess

mod unit ;
mod load_batch ;

pub use unit::{ LoadableUnit, SharedObject, RegistrationHook, REGISTRATION_HOOK };
pub use load_batch::{ LoadError, load_batch, load_units };
