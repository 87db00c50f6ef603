//! Remote methods: named operations exposed over HTTP, each declaring the
//! scopes and principal a caller must present.

pub mod method;
pub mod registry;

pub use method::{PrincipalRule, RemoteMethod};
pub use registry::{names, MethodRegistry, MethodRegistryBuilder};
