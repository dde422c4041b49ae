use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use tracing::{trace, warn};

/// Priority used when the caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Receives the registry (so handlers can dispatch nested hooks), the
/// current value and the extra arguments of the dispatch.
pub type FilterHandler = Box<dyn Fn(&HookRegistry, Value, &[Value]) -> Value + Send + Sync>;

/// Receives the registry, the dispatch arguments and an output buffer.
pub type ActionHandler = Box<dyn Fn(&HookRegistry, &[Value], &mut String) + Send + Sync>;

struct Registered<H> {
    priority: i32,
    handler: H,
}

type Chain<H> = SmallVec<[Registered<H>; 2]>;

#[derive(Default)]
pub struct HookRegistry {
    filters: AHashMap<String, Chain<FilterHandler>>,
    actions: AHashMap<String, Chain<ActionHandler>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut filters: Vec<(&str, usize)> = self
            .filters
            .iter()
            .map(|(name, chain)| (name.as_str(), chain.len()))
            .collect();
        filters.sort_unstable();
        let mut actions: Vec<(&str, usize)> = self
            .actions
            .iter()
            .map(|(name, chain)| (name.as_str(), chain.len()))
            .collect();
        actions.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("filters", &filters)
            .field("actions", &actions)
            .finish()
    }
}

fn insert_ordered<H>(chain: &mut Chain<H>, priority: i32, handler: H) {
    // Ties go after existing entries so registration order is kept.
    let at = chain.partition_point(|entry| entry.priority <= priority);
    chain.insert(at, Registered { priority, handler });
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter<F>(&mut self, name: impl Into<String>, priority: i32, handler: F)
    where
        F: Fn(&HookRegistry, Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(hook = %name, priority, "Registering filter");
        let chain = self.filters.entry(name).or_default();
        insert_ordered(chain, priority, Box::new(handler) as FilterHandler);
    }

    pub fn add_action<F>(&mut self, name: impl Into<String>, priority: i32, handler: F)
    where
        F: Fn(&HookRegistry, &[Value], &mut String) + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(hook = %name, priority, "Registering action");
        let chain = self.actions.entry(name).or_default();
        insert_ordered(chain, priority, Box::new(handler) as ActionHandler);
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.get(name).is_some_and(|chain| !chain.is_empty())
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.get(name).is_some_and(|chain| !chain.is_empty())
    }

    /// Number of handlers attached to a filter.
    pub fn filter_count(&self, name: &str) -> usize {
        self.filters.get(name).map_or(0, |chain| chain.len())
    }

    /// Drop every filter and action handler registered under `name`.
    pub fn remove_all(&mut self, name: &str) {
        self.filters.remove(name);
        self.actions.remove(name);
    }

    /// Run `value` through every handler of the filter `name`.
    ///
    /// With no handlers the value comes back untouched.
    pub fn apply_filters(&self, name: &str, value: Value, args: &[Value]) -> Value {
        let Some(chain) = self.filters.get(name) else {
            return value;
        };
        trace!(hook = name, handlers = chain.len(), "Applying filters");
        chain
            .iter()
            .fold(value, |current, entry| (entry.handler)(self, current, args))
    }

    /// Typed front end for [`HookRegistry::apply_filters`].
    ///
    /// If the chain produces something that no longer reads back as `T`, the
    /// original value is returned and a warning is logged.
    pub fn apply<T>(&self, name: &str, value: T, args: &[Value]) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        if !self.has_filter(name) {
            return value;
        }
        let encoded = match serde_json::to_value(&value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(hook = name, error = %e, "Filter value is not serializable, skipping");
                return value;
            }
        };
        let filtered = self.apply_filters(name, encoded, args);
        match serde_json::from_value(filtered) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(hook = name, error = %e, "Filter returned an unexpected value, keeping original");
                value
            }
        }
    }

    /// Run every handler of the action `name` and return their combined output.
    pub fn do_action(&self, name: &str, args: &[Value]) -> String {
        let mut output = String::new();
        if let Some(chain) = self.actions.get(name) {
            trace!(hook = name, handlers = chain.len(), "Running actions");
            for entry in chain {
                (entry.handler)(self, args, &mut output);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn append(
        suffix: &'static str,
    ) -> impl Fn(&HookRegistry, Value, &[Value]) -> Value + Send + Sync {
        move |_, value, _| match value {
            Value::String(s) => Value::String(s + suffix),
            other => other,
        }
    }

    #[test]
    fn test_unknown_filter_returns_input() {
        let hooks = HookRegistry::new();
        assert_eq!(hooks.apply_filters("missing", json!(3), &[]), json!(3));
        assert_eq!(hooks.apply("missing", "x".to_string(), &[]), "x");
    }

    #[test]
    fn test_filters_thread_value_in_registration_order() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("title", DEFAULT_PRIORITY, append("-a"));
        hooks.add_filter("title", DEFAULT_PRIORITY, append("-b"));
        hooks.add_filter("title", DEFAULT_PRIORITY, append("-c"));

        let out: String = hooks.apply("title", "t".to_string(), &[]);
        assert_eq!(out, "t-a-b-c");
    }

    #[test]
    fn test_priority_orders_before_registration() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("title", 20, append("-late"));
        hooks.add_filter("title", 5, append("-early"));
        hooks.add_filter("title", DEFAULT_PRIORITY, append("-mid"));

        let out: String = hooks.apply("title", "t".to_string(), &[]);
        assert_eq!(out, "t-early-mid-late");
    }

    #[test]
    fn test_filter_receives_extra_args() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("count", DEFAULT_PRIORITY, |_, value, args| {
            let base = value.as_i64().unwrap_or(0);
            let extra = args.first().and_then(Value::as_i64).unwrap_or(0);
            json!(base + extra)
        });
        assert_eq!(hooks.apply("count", 2_i64, &[json!(40)]), 42);
    }

    #[test]
    fn test_wrong_shape_keeps_original() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("flag", DEFAULT_PRIORITY, |_, _, _| json!("not a bool"));
        assert!(!hooks.apply("flag", false, &[]));
    }

    #[test]
    fn test_actions_collect_output() {
        let mut hooks = HookRegistry::new();
        hooks.add_action("notices", DEFAULT_PRIORITY, |_, _, out| out.push_str("<b>"));
        hooks.add_action("notices", 1, |_, args, out| {
            out.push_str(args.first().and_then(Value::as_str).unwrap_or_default());
        });

        assert_eq!(hooks.do_action("notices", &[json!("first")]), "first<b>");
        assert_eq!(hooks.do_action("nothing", &[]), "");
    }

    #[test]
    fn test_handlers_can_dispatch_nested_filters() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("inner", DEFAULT_PRIORITY, append("-inner"));
        hooks.add_filter("outer", DEFAULT_PRIORITY, |registry, value, args| {
            let inner: String = registry.apply("inner", "x".to_string(), args);
            match value {
                Value::String(s) => Value::String(format!("{}+{}", s, inner)),
                other => other,
            }
        });

        let out: String = hooks.apply("outer", "o".to_string(), &[]);
        assert_eq!(out, "o+x-inner");
    }

    #[test]
    fn test_remove_all() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("x", DEFAULT_PRIORITY, append("!"));
        hooks.add_action("x", DEFAULT_PRIORITY, |_, _, _| {});
        assert!(hooks.has_filter("x"));
        assert!(hooks.has_action("x"));
        assert_eq!(hooks.filter_count("x"), 1);

        hooks.remove_all("x");
        assert!(!hooks.has_filter("x"));
        assert!(!hooks.has_action("x"));
    }
}
