#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use od_invoke as invoke;
pub use od_os as os;
pub use od_reflect as reflect;
pub use od_utils as utils;

use od_os::sync::LazyLock;
use od_reflect::Reflector;

/// A process-wide engine with the built-in handlers and every type annotated
/// with `#[reflect(auto_register)]`.
///
/// Libraries should take a `&Reflector` instead of calling this.
pub fn default_reflector() -> &'static Reflector {
    static REFLECTOR: LazyLock<Reflector> = LazyLock::new(|| {
        let reflector = Reflector::new();
        reflector.types_mut().auto_register();
        reflector
    });
    &REFLECTOR
}
