//! Field type auto-registration via the inventory crate.
//!
//! Each field kind submits a [`FieldRegistration`] next to its definition.
//! Downstream crates register their own kinds the same way:
//!
//! ```ignore
//! fn build_percent(_params: &mut Params) -> FieldResult<FieldKind> {
//!     Ok(FieldKind::Custom(CustomField::new("percent", BuiltinType::named("float"), Percent)))
//! }
//!
//! fieldom::inventory::submit! { FieldRegistration::new("percent", build_percent) }
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::errors::{FieldError, FieldResult};
use crate::field::FieldKind;
use crate::params::Params;

/// Builds a field kind from the parameters left after the common options
/// (`multi`, `required`, `fields`) were taken.
pub type FieldFactory = fn(&mut Params) -> FieldResult<FieldKind>;

/// A named entry in the field type registry.
pub struct FieldRegistration {
    /// Wire type name used as the dispatch key (e.g. "text").
    pub name: &'static str,
    /// Constructor for the kind.
    pub build: FieldFactory,
}

impl FieldRegistration {
    pub const fn new(name: &'static str, build: FieldFactory) -> Self {
        Self { name, build }
    }
}

inventory::collect!(FieldRegistration);

static REGISTRY: OnceLock<HashMap<&'static str, Vec<&'static FieldRegistration>>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, Vec<&'static FieldRegistration>> {
    REGISTRY.get_or_init(|| {
        let mut table: HashMap<&'static str, Vec<&'static FieldRegistration>> = HashMap::new();
        for registration in inventory::iter::<FieldRegistration>() {
            log::trace!("registering field type `{}`", registration.name);
            table.entry(registration.name).or_default().push(registration);
        }
        table
    })
}

/// Get all registered field types.
pub fn registered_field_types() -> impl Iterator<Item = &'static FieldRegistration> {
    inventory::iter::<FieldRegistration>()
}

/// Looks up the registration for a type name.
///
/// Fails with `UnknownType` on a miss and with `Config` when more than one
/// registration claims the name.
pub fn lookup(name: &str) -> FieldResult<&'static FieldRegistration> {
    match registry().get(name).map(Vec::as_slice) {
        Some(&[registration]) => Ok(registration),
        Some(&[]) | None => Err(FieldError::UnknownType { name: name.to_string() }),
        Some(_) => Err(FieldError::config(format!("field type `{name}` is registered more than once"))),
    }
}

/// Whether `name` resolves to exactly one registration.
pub fn is_registered(name: &str) -> bool {
    lookup(name).is_ok()
}
