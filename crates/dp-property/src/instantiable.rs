//! Turning type-erased containers into typed initializers.
//!
//! Plugins implement [`Instantiable`] with a single typed entry point. A
//! [`Capability`] built once per plugin type does the rest: it checks whether
//! the incoming container already has the plugin's shape (direct path) or has
//! to be merged by property name into a fresh default initializer (merge path).

use crate::container::PropertyContainer;
use crate::error::PropertyResult;
use crate::initializer::Initializer;
use crate::schema::Schema;
use std::fmt;
use tracing::debug;

/// Route taken by one instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantiatePath {
    /// The container already had the target shape and was used as is.
    Direct,
    /// The container was copied by name into a fresh default initializer.
    Merged,
}

/// Implemented by each plugin.
pub trait Instantiable {
    type Initializer: Initializer;

    /// Pre-step run for every container, whatever its shape.
    fn instantiate_base(&mut self, _init: &PropertyContainer) -> PropertyResult<()> {
        Ok(())
    }

    /// Typed entry point.
    fn instantiate(&mut self, init: Self::Initializer) -> PropertyResult<()>;

    /// One-off instantiation without a pre-built [`Capability`].
    fn instantiate_internal(&mut self, init: PropertyContainer) -> PropertyResult<InstantiatePath>
    where
        Self: Sized,
    {
        Capability::<Self>::new().instantiate(self, init)
    }
}

/// Resolve `init` into `C`, taking the direct or merge path.
pub fn resolve<C: Initializer>(
    schema: &Schema,
    init: PropertyContainer,
) -> PropertyResult<(C, InstantiatePath)> {
    resolve_with(schema, C::default, init)
}

fn resolve_with<C: Initializer>(
    schema: &Schema,
    make_default: fn() -> C,
    init: PropertyContainer,
) -> PropertyResult<(C, InstantiatePath)> {
    if init.name() == schema.name() {
        debug!(container = %init.name(), "initializer matches, using it directly");
        return Ok((C::from_container(init)?, InstantiatePath::Direct));
    }

    debug!(
        source = %init.name(),
        target = %schema.name(),
        "merging initializer by property name"
    );
    let mut tmp = make_default().into_container();
    schema.merge_into(&mut tmp, &init)?;
    Ok((C::from_container(tmp)?, InstantiatePath::Merged))
}

/// Per-plugin-type instantiation capability.
///
/// Holds the schema of the plugin's initializer, the function building its
/// default instance and the typed entry point.
pub struct Capability<P: Instantiable> {
    schema: Schema,
    make_default: fn() -> P::Initializer,
    entry: fn(&mut P, P::Initializer) -> PropertyResult<()>,
}

impl<P: Instantiable> Capability<P> {
    pub fn new() -> Self {
        Self {
            schema: Schema::of::<P::Initializer>(),
            make_default: <P::Initializer as Default>::default,
            entry: <P as Instantiable>::instantiate,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Canonical container name of the plugin's initializer.
    pub fn container_name(&self) -> &str {
        self.schema.name()
    }

    /// Default container of the plugin's initializer.
    pub fn template(&self) -> PropertyContainer {
        (self.make_default)().into_container()
    }

    /// Run the base hook, resolve `init` and call the typed entry point.
    ///
    /// Any failure before the entry point means the entry point never runs.
    pub fn instantiate(
        &self,
        plugin: &mut P,
        init: PropertyContainer,
    ) -> PropertyResult<InstantiatePath> {
        plugin.instantiate_base(&init)?;
        let (typed, path) = resolve_with(&self.schema, self.make_default, init)?;
        (self.entry)(plugin, typed)?;
        Ok(path)
    }
}

impl<P: Instantiable> Default for Capability<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Instantiable> Clone for Capability<P> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            make_default: self.make_default,
            entry: self.entry,
        }
    }
}

impl<P: Instantiable> fmt::Debug for Capability<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyError;
    use crate::property::{Property, PropertySlot};

    #[derive(Debug, Clone)]
    struct Config {
        a: Property<i64>,
        b: Property<String>,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                a: Property::required("a"),
                b: Property::with_value("b", false, "x".to_string()),
            }
        }
    }

    impl Initializer for Config {
        const CONTAINER_NAME: &'static str = "Config";

        fn into_container(self) -> PropertyContainer {
            PropertyContainer::new(Self::CONTAINER_NAME)
                .with(self.a)
                .with(self.b)
        }

        fn from_container(mut container: PropertyContainer) -> PropertyResult<Self> {
            Ok(Self {
                a: container.take("a")?,
                b: container.take("b")?,
            })
        }
    }

    #[derive(Default)]
    struct Plugin {
        base_calls: usize,
        received: Option<Config>,
    }

    impl Instantiable for Plugin {
        type Initializer = Config;

        fn instantiate_base(&mut self, _init: &PropertyContainer) -> PropertyResult<()> {
            self.base_calls += 1;
            Ok(())
        }

        fn instantiate(&mut self, init: Config) -> PropertyResult<()> {
            self.received = Some(init);
            Ok(())
        }
    }

    #[test]
    fn direct_path_keeps_slots_untouched() {
        let mut init = Config::default().into_container();
        init.set("a", 3_i64).unwrap();
        // An optional field left unset by the author stays unset.
        init.insert(Box::new(Property::<String>::optional("b")));

        let mut plugin = Plugin::default();
        let path = Capability::<Plugin>::new().instantiate(&mut plugin, init).unwrap();

        assert_eq!(path, InstantiatePath::Direct);
        let cfg = plugin.received.unwrap();
        assert_eq!(cfg.a.get(), 3);
        assert!(!cfg.b.is_set());
        assert_eq!(cfg.b.get(), "");
    }

    #[test]
    fn merge_path_fills_defaults() {
        let init = PropertyContainer::new("Initializer").with(Property::with_value("a", true, 7_i64));
        let mut plugin = Plugin::default();
        let path = Capability::<Plugin>::new().instantiate(&mut plugin, init).unwrap();

        assert_eq!(path, InstantiatePath::Merged);
        let cfg = plugin.received.unwrap();
        assert_eq!(cfg.a.get(), 7);
        assert_eq!(cfg.b.get(), "x");
        assert_eq!(plugin.base_calls, 1);
    }

    #[test]
    fn missing_required_never_reaches_entry_point() {
        let init = PropertyContainer::new("Initializer")
            .with(Property::with_value("b", false, "y".to_string()));
        let mut plugin = Plugin::default();
        let err = plugin.instantiate_internal(init).unwrap_err();

        assert!(matches!(err, PropertyError::IncompatibleInitializer { .. }));
        assert!(plugin.received.is_none());
        assert_eq!(plugin.base_calls, 1);
    }

    #[test]
    fn resolve_without_plugin() {
        let schema = Schema::of::<Config>();
        let init = PropertyContainer::new("Other")
            .with(Property::with_value("a", true, 1_i64))
            .with(Property::with_value("unrelated", false, true));
        let (cfg, path) = resolve::<Config>(&schema, init).unwrap();
        assert_eq!(path, InstantiatePath::Merged);
        assert_eq!(cfg.a.get(), 1);
    }

    #[test]
    fn template_matches_schema() {
        let cap = Capability::<Plugin>::new();
        assert_eq!(cap.container_name(), "Config");
        let template = cap.template();
        assert_eq!(template.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
