use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use log::{debug, trace};
use od_os::sync::Snapshot;

use crate::handler::{
    EnumHandler, ListHandler, OptionalHandler, PrimitiveHandler, StructHandler, TypeHandler,
};
use crate::info::TypeInfo;

type Entry = (TypeId, Arc<dyn TypeHandler>);

/// The set of installed [`TypeHandler`]s.
///
/// Writes replace the whole handler list atomically, so a concurrent
/// [`rank`](Self::rank) sees either the set before or after a registration.
///
/// At most one handler per concrete type is installed.
///
/// ```
/// use od_reflect::handler::StructHandler;
/// use od_reflect::info::Typed;
/// use od_reflect::registry::HandlerRegistry;
///
/// let handlers = HandlerRegistry::with_builtin();
/// assert!(!handlers.register(StructHandler));
///
/// let chain = handlers.serializer_chain(<Vec<u8>>::type_info());
/// assert_eq!(chain.len(), 1);
/// ```
pub struct HandlerRegistry {
    handlers: Snapshot<Vec<Entry>>,
}

impl Default for HandlerRegistry {
    /// See [`HandlerRegistry::with_builtin`].
    #[inline]
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl HandlerRegistry {
    /// A registry without any handler.
    pub fn new() -> Self {
        Self {
            handlers: Snapshot::new(Vec::new()),
        }
    }

    /// A registry holding the built-in handlers.
    ///
    /// - [`PrimitiveHandler`]
    /// - [`EnumHandler`]
    /// - [`OptionalHandler`]
    /// - [`ListHandler`]
    /// - [`StructHandler`]
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register(PrimitiveHandler);
        registry.register(EnumHandler);
        registry.register(OptionalHandler);
        registry.register(ListHandler);
        registry.register(StructHandler);
        registry
    }

    /// Installs `handler`.
    ///
    /// Returns `false`, leaving the registry unchanged, if a handler of the
    /// same concrete type is already installed.
    pub fn register<H: TypeHandler>(&self, handler: H) -> bool {
        let id = TypeId::of::<H>();
        let handler: Arc<dyn TypeHandler> = Arc::new(handler);
        let inserted = self.handlers.update(|current| {
            if current.iter().any(|(installed, _)| *installed == id) {
                return None;
            }
            let mut next = current.clone();
            next.push((id, handler));
            Some(next)
        });
        if inserted {
            debug!("registered handler `{}`", core::any::type_name::<H>());
        }
        inserted
    }

    /// Removes the handler of concrete type `H`.
    ///
    /// Returns `false` if none was installed.
    pub fn unregister<H: TypeHandler>(&self) -> bool {
        let id = TypeId::of::<H>();
        let removed = self.handlers.update(|current| {
            if !current.iter().any(|(installed, _)| *installed == id) {
                return None;
            }
            Some(
                current
                    .iter()
                    .filter(|(installed, _)| *installed != id)
                    .cloned()
                    .collect(),
            )
        });
        if removed {
            debug!("unregistered handler `{}`", core::any::type_name::<H>());
        }
        removed
    }

    #[inline]
    pub fn contains<H: TypeHandler>(&self) -> bool {
        let id = TypeId::of::<H>();
        self.handlers.load().iter().any(|(installed, _)| *installed == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.load().is_empty()
    }

    /// Every handler applicable to `info`, highest priority first.
    ///
    /// Handlers with a priority `<= 0` are dropped; ties keep registration order.
    pub fn rank(&self, info: &'static TypeInfo) -> Vec<Arc<dyn TypeHandler>> {
        let handlers = self.handlers.load();
        let mut ranked: Vec<(i32, &Arc<dyn TypeHandler>)> = handlers
            .iter()
            .map(|(_, handler)| (handler.priority(info), handler))
            .filter(|(priority, _)| *priority > 0)
            .collect();
        // `sort_by` is stable.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().map(|(_, handler)| handler.clone()).collect()
    }

    /// Ranked handlers, cut after the first one that does not cascade on serialize.
    pub fn serializer_chain(&self, info: &'static TypeInfo) -> Vec<Arc<dyn TypeHandler>> {
        let chain = cascade(self.rank(info), |handler| handler.cascade_on_serialize());
        trace!("serializer chain of `{}`: {}", info.type_path(), ChainNames(&chain));
        chain
    }

    /// The highest ranked handler.
    pub fn deserializer_chain(&self, info: &'static TypeInfo) -> Option<Arc<dyn TypeHandler>> {
        let handler = self.rank(info).into_iter().next();
        if let Some(handler) = &handler {
            trace!("deserializer of `{}`: {}", info.type_path(), handler.name());
        }
        handler
    }

    /// Ranked handlers, cut after the first one that does not cascade on populate.
    pub fn populator_chain(&self, info: &'static TypeInfo) -> Vec<Arc<dyn TypeHandler>> {
        let chain = cascade(self.rank(info), |handler| handler.cascade_on_populate());
        trace!("populator chain of `{}`: {}", info.type_path(), ChainNames(&chain));
        chain
    }
}

fn cascade(
    ranked: Vec<Arc<dyn TypeHandler>>,
    cascades: impl Fn(&dyn TypeHandler) -> bool,
) -> Vec<Arc<dyn TypeHandler>> {
    let mut chain = Vec::with_capacity(ranked.len());
    for handler in ranked {
        let stop = !cascades(handler.as_ref());
        chain.push(handler);
        if stop {
            break;
        }
    }
    chain
}

struct ChainNames<'a>(&'a [Arc<dyn TypeHandler>]);

impl fmt::Display for ChainNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, handler) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(handler.name())?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.load();
        f.debug_list()
            .entries(handlers.iter().map(|(_, handler)| handler.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentNode;
    use crate::info::{AccessFlags, Typed};
    use crate::{Reflect, ReflectError, Reflector};

    struct Fixed<const P: i32, const CASCADE: bool>;

    impl<const P: i32, const CASCADE: bool> TypeHandler for Fixed<P, CASCADE> {
        fn priority(&self, _: &'static TypeInfo) -> i32 {
            P
        }

        fn cascade_on_serialize(&self) -> bool {
            CASCADE
        }

        fn cascade_on_populate(&self) -> bool {
            CASCADE
        }

        fn serialize(
            &self,
            _: &Reflector,
            _: &dyn Reflect,
            _: &'static TypeInfo,
            _: Option<&str>,
            _: bool,
            _: AccessFlags,
        ) -> Result<Option<DocumentNode>, ReflectError> {
            Ok(None)
        }
    }

    fn priorities(chain: &[Arc<dyn TypeHandler>]) -> Vec<i32> {
        chain
            .iter()
            .map(|handler| handler.priority(<u8 as Typed>::type_info()))
            .collect()
    }

    #[test]
    fn higher_priority_ranks_first() {
        let registry = HandlerRegistry::new();
        registry.register(Fixed::<5, false>);
        registry.register(Fixed::<10, false>);
        registry.register(Fixed::<0, false>);

        let info = <u8 as Typed>::type_info();
        assert_eq!(priorities(&registry.rank(info)), [10, 5]);
        assert_eq!(priorities(&registry.serializer_chain(info)), [10]);
        assert_eq!(
            registry.deserializer_chain(info).map(|h| h.priority(info)),
            Some(10)
        );
    }

    #[test]
    fn cascading_extends_chains() {
        let registry = HandlerRegistry::new();
        registry.register(Fixed::<10, true>);
        registry.register(Fixed::<7, false>);
        registry.register(Fixed::<3, false>);

        let info = <u8 as Typed>::type_info();
        assert_eq!(priorities(&registry.serializer_chain(info)), [10, 7]);
        assert_eq!(priorities(&registry.populator_chain(info)), [10, 7]);
    }

    #[test]
    fn register_and_unregister_are_idempotent() {
        let registry = HandlerRegistry::new();
        assert!(registry.register(Fixed::<1, false>));
        assert!(!registry.register(Fixed::<1, false>));
        assert!(registry.contains::<Fixed<1, false>>());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister::<Fixed<1, false>>());
        assert!(!registry.unregister::<Fixed<1, false>>());
        assert!(registry.is_empty());
    }

    #[test]
    fn builtin_struct_ranks_below_leaf_handlers() {
        let registry = HandlerRegistry::with_builtin();
        assert_eq!(registry.len(), 5);
        assert!(registry.rank(<Option<u8>>::type_info()).len() == 1);
        assert!(registry.rank(<u8 as Typed>::type_info()).len() == 1);
    }
}
