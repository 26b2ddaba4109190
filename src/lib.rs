//! A shared-object module runtime for building modular applications.
//!
//! A program assembles its behavior from independently replaceable
//! **modules** grouped under named **subsystems**. A module may be linked
//! into the binary at build time or discovered and loaded as a dynamic
//! shared object at run time; exactly one module per subsystem can be
//! elected the **active** implementation that routed API calls go to, while
//! broadcast APIs reach every registered module in registration order.
//!
//! # Core Concepts
//!
//! - [`Subsystem`]: A named, versioned extension point owning a registry of
//! 	modules and an optional active selection. Subsystems are `static`
//! 	records fixed at compile time.
//!
//! - [`Module`]: One implementation of a subsystem's contract: a name,
//! 	optional `init`/`term` lifecycle hooks, and a subsystem-specific
//! 	capability table of optional entry points. Absent entries are skipped
//! 	by dispatch, never invoked.
//!
//! - [`Registrar`]: The registration top half. [`Registrar::Direct`]
//! 	registers immediately (build-time linked modules); [`Registrar::Loader`]
//! 	stages into an open [`Session`] for the loader to resolve.
//!
//! - [`Session`]: The two-phase registration protocol scoping one loader
//! 	batch: a module's hook **stages** a registration, the loader **commits**
//! 	or **abandons** it once the load's verdict is known.
//!
//! - [`load_batch`]: The batch driver: opens each path as a shared object,
//! 	runs its exported [`REGISTRATION_HOOK`], and commits or abandons. Open
//! 	failures are collected, not fatal.
//!
//! - [`SlotList`]: The registry substrate - an arena-backed circular
//! 	doubly-linked list with O(1) insert/remove and stable handles.
//!
//! # Example
//!
//! ```
//! use dso_link::{ Module, Registrar, Session, Subsystem };
//!
//! // A subsystem's capability table: entry points any module may leave
//! // unimplemented.
//! struct SchedulerApi {
//! 	next_task: Option<Box<dyn Fn() -> u32 + Send + Sync>>,
//! }
//!
//! // Subsystems are static records: name, description, contract version.
//! static SCHEDULER: Subsystem<SchedulerApi> =
//! 	Subsystem::new( "scheduler", "task scheduling APIs", 0x0001_0000 );
//!
//! # fn main() -> Result<(), dso_link::RegistryError> {
//! // Build-time linked modules register directly: declare the record, then
//! // link it through the direct top half.
//! let fallback = SCHEDULER.declare(
//! 	Module::new( "fifo", SchedulerApi { next_task: None })
//! 		.with_init(|| println!( "fifo scheduler up" )),
//! );
//! Registrar::Direct.register( &SCHEDULER, fallback )?;
//!
//! // Loader-mediated registration is two-phase: the module's hook stages,
//! // the driver commits once it knows the load as a whole succeeded.
//! // `load_batch` drives this for real shared objects; the protocol itself
//! // works the same by hand.
//! let mut session = Session::begin();
//! let round_robin = SCHEDULER.declare( Module::new( "round-robin", SchedulerApi {
//! 	next_task: Some( Box::new(|| 7 )),
//! }));
//! Registrar::Loader( &mut session ).register( &SCHEDULER, round_robin )?;
//! session.commit( None, true )?; // elect it the active implementation
//! session.end();
//!
//! // Lifecycle entry points broadcast to every registered module.
//! SCHEDULER.initialize();
//!
//! // Routed dispatch goes to the active module only; an absent hook or
//! // absent active module is a defined no-op, not an error.
//! let task = SCHEDULER.route(| module | module.api().next_task.as_ref().map(| hook | hook() ));
//! assert_eq!( task, Some( 7 ));
//!
//! // Broadcast dispatch walks registration order, skipping absent hooks;
//! // the last produced result wins.
//! let last = SCHEDULER.broadcast(| module | module.api().next_task.as_ref().map(| hook | hook() ));
//! assert_eq!( last, Some( 7 ));
//!
//! SCHEDULER.terminate();
//! # Ok(())
//! # }
//! ```
//!
//! # Loadable modules
//!
//! A module built as a shared object exports one symbol,
//! [`REGISTRATION_HOOK`], with the [`RegistrationHook`] signature. The hook
//! declares the module and registers it through the handed-in [`Registrar`]:
//!
//! ```ignore
//! use dso_link::{ Module, Registrar, Subsystem };
//! # struct PktioApi ;
//! # static PKTIO: Subsystem<PktioApi> = Subsystem::new( "pktio", "packet IO", 1 );
//!
//! #[no_mangle]
//! pub fn dso_link_module_register( registrar: &mut Registrar<'_> ) {
//! 	let handle = PKTIO.declare( Module::new( "socket pktio", PktioApi { /* .. */ } ));
//! 	if let Err( err ) = registrar.register( &PKTIO, handle ) {
//! 		log::warn!( "socket pktio registration rejected: {err}" );
//! 	}
//! }
//! ```
//!
//! The same hook body works when the module is linked into the binary
//! instead - call it with [`Registrar::Direct`] at startup.

mod slot_list ;
mod module ;
mod subsystem ;
mod session ;
mod loading ;
mod utils ;

#[doc( no_inline )]
pub use libloading::Library ;

pub use slot_list::{ SlotList, NodeIndex, Iter };
pub use module::{ Module, ModuleHandle, LifecycleHook };
pub use subsystem::{ Subsystem, RegistryError };
pub use session::{ Session, Registrar };
pub use loading::{ LoadableUnit, SharedObject, RegistrationHook, REGISTRATION_HOOK, LoadError, load_batch, load_units };
pub use utils::PartialSuccess ;
