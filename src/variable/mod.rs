//! Typed, domain-scoped variables backed by a [`RecordStore`]
//!
//! A [`Variable`] owns a name and a default. Its current value lives in the
//! JSON record of a domain, next to every other variable sharing the store:
//!
//! ```text
//! storage["__PERSISTANCE__"] = {"str":"AAA","num":321}
//! storage["abc"]             = {"num":42}
//! ```
//!
//! A name missing from the record means the default is in effect. The default
//! is never written.

pub mod boolean;
pub mod parse;

pub use boolean::BooleanVariable;

use crate::domain::Domain;
use crate::error::{Result, VariableError};
use crate::record::{Record, RecordStore};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Parses user-supplied text into a variable's type
pub type Parser<T> = Arc<dyn Fn(&str) -> anyhow::Result<T> + Send + Sync>;

/// Called after every mutation with the re-read value and the domain name
pub type ChangeHook<T> = Box<dyn Fn(&T, Option<&str>) + Send + Sync>;

/// A named value with a default, persisted per domain
pub struct Variable<T> {
    name: String,
    default: T,
    description: Option<String>,
    store: Arc<RecordStore>,
    parser: Parser<T>,
    on_change: Option<ChangeHook<T>>,
}

impl<T> Variable<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    /// Create a variable using [`parse::like_default`] for string input
    pub fn new(name: impl Into<String>, default: T, store: Arc<RecordStore>) -> Self {
        let tag = serde_json::to_value(&default)
            .map(|value| parse::type_tag(&value))
            .unwrap_or("object");

        Self {
            name: name.into(),
            default,
            description: None,
            store,
            parser: Arc::new(move |raw: &str| parse::like_default::<T>(raw, tag)),
            on_change: None,
        }
    }

    /// Replace the parser used by [`set_with_string`](Self::set_with_string)
    pub fn with_parser(
        mut self,
        parser: impl Fn(&str) -> anyhow::Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Set the description (help text)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register the change hook, replacing any previous one
    pub fn on_change(mut self, hook: impl Fn(&T, Option<&str>) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Effective value in `domain`: the stored value, or the default
    pub fn get(&self, domain: impl Into<Domain>) -> Result<T> {
        let domain = domain.into();
        let record = self.store.load(&domain)?;
        self.effective(&record, &domain)
    }

    /// Store `value` in `domain`
    pub fn set(&self, value: T, domain: impl Into<Domain>) -> Result<()> {
        let domain = domain.into();
        let encoded = self.encode(&value)?;

        self.store.update(&domain, |record| {
            record.insert(self.name.clone(), encoded);
            Ok(())
        })?;
        debug!("Set variable {} in {}", self.name, domain);

        self.notify(&domain)
    }

    /// Remove the stored value in `domain` so the default applies again
    ///
    /// The record is rewritten and the hook fires even when nothing was stored.
    pub fn clear(&self, domain: impl Into<Domain>) -> Result<()> {
        let domain = domain.into();

        let removed = self
            .store
            .update(&domain, |record| Ok(record.shift_remove(&self.name).is_some()))?;
        debug!("Cleared variable {} in {} (was set: {})", self.name, domain, removed);

        self.notify(&domain)
    }

    /// Parse `raw` with this variable's parser and store the result
    ///
    /// Returns `Ok(false)` without touching storage if `raw` does not parse.
    pub fn set_with_string(&self, raw: &str, domain: impl Into<Domain>) -> Result<bool> {
        let domain = domain.into();

        match (self.parser)(raw) {
            Ok(value) => {
                self.set(value, &domain)?;
                Ok(true)
            }
            Err(e) => {
                warn!("Rejected value for {}: {:#}", self.name, e);
                Ok(false)
            }
        }
    }

    /// Render `"{domain/}{name}: {type} = {json}"`
    ///
    /// `{type}` names the default value's JSON type, whatever is stored.
    pub fn describe(&self, domain: impl Into<Domain>) -> Result<String> {
        let domain = domain.into();
        let tag = parse::type_tag(&self.encode(&self.default)?);
        let current = self.encode(&self.get(&domain)?)?;

        let prefix = match domain.name() {
            Some(name) => format!("{}/", name),
            None => String::new(),
        };
        Ok(format!("{}{}: {} = {}", prefix, self.name, tag, current))
    }

    fn effective(&self, record: &Record, domain: &Domain) -> Result<T> {
        match record.get(&self.name) {
            Some(value) => T::deserialize(value).map_err(|source| VariableError::InvalidValue {
                name: self.name.clone(),
                key: domain.record_key().to_string(),
                source,
            }),
            None => Ok(self.default.clone()),
        }
    }

    fn encode(&self, value: &T) -> Result<serde_json::Value> {
        serde_json::to_value(value).map_err(|source| VariableError::Encode {
            name: self.name.clone(),
            source,
        })
    }

    fn notify(&self, domain: &Domain) -> Result<()> {
        if let Some(hook) = &self.on_change {
            let value = self.get(domain)?;
            hook(&value, domain.name());
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    fn setup() -> (Arc<MemoryStorage>, Arc<RecordStore>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(RecordStore::new(storage.clone()));
        (storage, store)
    }

    fn raw(storage: &MemoryStorage, key: &str) -> Option<String> {
        storage.get_item(key).unwrap()
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Nested {
        a: Vec<String>,
        b: Vec<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        c: Option<Box<Nested>>,
    }

    #[test]
    fn test_defaults_without_domain() {
        let (storage, store) = setup();
        let s = Variable::new("str", "hello".to_string(), store.clone());
        let num = Variable::new("num", 123, store);

        assert_eq!(s.get(Domain::NONE).unwrap(), "hello");
        assert_eq!(num.get(Domain::NONE).unwrap(), 123);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_set_get_clear_without_domain() {
        let (storage, store) = setup();
        let s = Variable::new("str", "hello".to_string(), store.clone());
        let num = Variable::new("num", 123, store);

        s.set("AAA".to_string(), Domain::NONE).unwrap();
        num.set(321, Domain::NONE).unwrap();
        assert_eq!(s.get(Domain::NONE).unwrap(), "AAA");
        assert_eq!(num.get(Domain::NONE).unwrap(), 321);

        assert_eq!(storage.len(), 1);
        assert_eq!(
            raw(&storage, "__PERSISTANCE__").as_deref(),
            Some(r#"{"str":"AAA","num":321}"#)
        );

        s.clear(Domain::NONE).unwrap();
        assert_eq!(s.get(Domain::NONE).unwrap(), "hello");
        assert_eq!(raw(&storage, "__PERSISTANCE__").as_deref(), Some(r#"{"num":321}"#));

        num.clear(Domain::NONE).unwrap();
        assert_eq!(num.get(Domain::NONE).unwrap(), 123);
        assert_eq!(raw(&storage, "__PERSISTANCE__").as_deref(), Some("{}"));
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let (storage, store) = setup();
        let s = Variable::new("str", "hello".to_string(), store.clone());
        let num = Variable::new("num", 123, store);

        s.set(String::new(), Domain::NONE).unwrap();
        num.set(0, Domain::NONE).unwrap();

        assert_eq!(s.get(Domain::NONE).unwrap(), "");
        assert_eq!(num.get(Domain::NONE).unwrap(), 0);
        assert_eq!(
            raw(&storage, "__PERSISTANCE__").as_deref(),
            Some(r#"{"str":"","num":0}"#)
        );
        assert_eq!(num.describe(Domain::NONE).unwrap(), "num: number = 0");
        assert_eq!(s.describe(Domain::NONE).unwrap(), r#"str: string = """#);
    }

    #[test]
    fn test_domains_are_independent() {
        let (storage, store) = setup();
        let num = Variable::new("num", 123, store);

        assert_eq!(num.get("abc").unwrap(), 123);
        num.set(42, "abc").unwrap();
        num.set(43, "def").unwrap();

        assert_eq!(num.get("abc").unwrap(), 42);
        assert_eq!(num.get("def").unwrap(), 43);
        assert_eq!(num.get(Domain::NONE).unwrap(), 123);
        assert_eq!(raw(&storage, "abc").as_deref(), Some(r#"{"num":42}"#));
        assert_eq!(raw(&storage, "def").as_deref(), Some(r#"{"num":43}"#));

        assert_eq!(num.describe("abc").unwrap(), "abc/num: number = 42");
        assert_eq!(num.describe(Domain::NONE).unwrap(), "num: number = 123");
    }

    #[test]
    fn test_clear_unset_value_still_writes() {
        let (storage, store) = setup();
        let num = Variable::new("num", 123, store);

        num.clear("DOMAIN").unwrap();
        assert_eq!(num.get("DOMAIN").unwrap(), 123);
        assert_eq!(raw(&storage, "DOMAIN").as_deref(), Some("{}"));
    }

    #[test]
    fn test_numeric_domain() {
        let (storage, store) = setup();
        let num = Variable::new("num", 1, store);

        num.set(7, 0i32).unwrap();
        assert_eq!(num.get("0").unwrap(), 7);
        assert_eq!(raw(&storage, "0").as_deref(), Some(r#"{"num":7}"#));
        assert_eq!(num.describe(0u8).unwrap(), "0/num: number = 7");
        assert_eq!(num.get(Domain::NONE).unwrap(), 1);
    }

    #[test]
    fn test_complex_type() {
        let (storage, store) = setup();
        let default = Nested {
            a: vec!["a".into()],
            b: vec![1],
            c: None,
        };
        let obj = Variable::new("obj", default.clone(), store);
        assert_eq!(obj.get("1234").unwrap(), default);

        let value = Nested {
            b: vec![42, 43],
            c: Some(Box::new(Nested {
                a: vec!["b".into(), "c".into()],
                b: vec![2, 3],
                c: None,
            })),
            ..default.clone()
        };
        obj.set(value.clone(), 1234u32).unwrap();
        assert_eq!(obj.get("1234").unwrap(), value);

        let expected = r#"{"a":["a"],"b":[42,43],"c":{"a":["b","c"],"b":[2,3]}}"#;
        assert_eq!(
            raw(&storage, "1234"),
            Some(format!(r#"{{"obj":{}}}"#, expected))
        );
        assert_eq!(
            obj.describe("1234").unwrap(),
            format!("1234/obj: object = {}", expected)
        );

        obj.clear("1234").unwrap();
        assert_eq!(obj.get("1234").unwrap(), default);
    }

    #[test]
    fn test_change_hook() {
        let (_, store) = setup();
        let seen: Arc<Mutex<Vec<(i64, Option<String>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let num = Variable::new("num", 100i64, store).on_change(move |value, domain| {
            sink.lock().unwrap().push((*value + 1, domain.map(str::to_string)));
        });

        num.set(42, Domain::NONE).unwrap();
        num.set(50, "50").unwrap();
        num.clear(Domain::NONE).unwrap();
        num.clear("50").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (43, None),
                (51, Some("50".to_string())),
                (101, None),
                (101, Some("50".to_string())),
            ]
        );
    }

    #[test]
    fn test_clear_unset_value_fires_hook() {
        let (storage, store) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let num = Variable::new("num", 1i64, store).on_change(move |value, domain| {
            sink.lock().unwrap().push((*value, domain.map(str::to_string)));
        });

        num.clear("DOMAIN").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, Some("DOMAIN".to_string()))]);
        assert_eq!(raw(&storage, "DOMAIN").as_deref(), Some("{}"));
    }

    #[test]
    fn test_json_value_parses_like_default() {
        let (storage, store) = setup();
        let v = Variable::new("v", json!(5), store.clone());

        assert!(!v.set_with_string("abc", Domain::NONE).unwrap());
        assert!(!v.set_with_string("\"7\"", Domain::NONE).unwrap());
        assert_eq!(raw(&storage, "__PERSISTANCE__"), None);

        assert!(v.set_with_string("7", Domain::NONE).unwrap());
        assert_eq!(v.get(Domain::NONE).unwrap(), json!(7));
        assert_eq!(v.describe(Domain::NONE).unwrap(), "v: number = 7");

        let label = Variable::new("label", json!("x"), store);
        assert!(label.set_with_string("7", Domain::NONE).unwrap());
        assert_eq!(label.get(Domain::NONE).unwrap(), json!("7"));
    }

    #[test]
    fn test_set_with_string() {
        let (storage, store) = setup();
        let num = Variable::new("num", 123i64, store.clone());
        let s = Variable::new("str", "x".to_string(), store);

        assert!(num.set_with_string("1234", Domain::NONE).unwrap());
        assert_eq!(num.get(Domain::NONE).unwrap(), 1234);

        let before = raw(&storage, "__PERSISTANCE__");
        assert!(!num.set_with_string("abc", Domain::NONE).unwrap());
        assert!(!num.set_with_string("\"5\"", Domain::NONE).unwrap());
        assert_eq!(raw(&storage, "__PERSISTANCE__"), before);

        assert!(s.set_with_string("{\"not\": \"decoded\"}", "d").unwrap());
        assert_eq!(s.get("d").unwrap(), "{\"not\": \"decoded\"}");
    }

    #[test]
    fn test_rejected_string_skips_hook() {
        let (_, store) = setup();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();

        let num = Variable::new("num", 1u32, store)
            .on_change(move |_, _| *counter.lock().unwrap() += 1);

        assert!(!num.set_with_string("-1", Domain::NONE).unwrap());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_custom_parser() {
        let (_, store) = setup();
        let level = Variable::new("level", 3u8, store).with_parser(|raw| {
            let n: u8 = raw.trim().parse()?;
            anyhow::ensure!(n <= 5, "level {} is above 5", n);
            Ok(n)
        });

        assert!(level.set_with_string(" 4 ", Domain::NONE).unwrap());
        assert_eq!(level.get(Domain::NONE).unwrap(), 4);
        assert!(!level.set_with_string("9", Domain::NONE).unwrap());
        assert_eq!(level.get(Domain::NONE).unwrap(), 4);
    }

    #[test]
    fn test_siblings_survive_mutation() {
        let (storage, store) = setup();
        let a = Variable::new("a", 0, store.clone());
        let b = Variable::new("b", 0, store);

        a.set(1, "d").unwrap();
        b.set(2, "d").unwrap();
        a.clear("d").unwrap();

        assert_eq!(b.get("d").unwrap(), 2);
        assert_eq!(raw(&storage, "d").as_deref(), Some(r#"{"b":2}"#));
    }

    #[test]
    fn test_wrong_shape_is_invalid_value() {
        let (storage, store) = setup();
        storage.set_item("__PERSISTANCE__", r#"{"num":"abc"}"#).unwrap();
        let num = Variable::new("num", 1, store);

        let err = num.get(Domain::NONE).unwrap_err();
        assert!(matches!(err, VariableError::InvalidValue { .. }));
    }

    #[test]
    fn test_corrupt_record_surfaces() {
        let (storage, store) = setup();
        storage.set_item("bad", "{").unwrap();
        let num = Variable::new("num", 1, store);

        assert!(num.get("bad").unwrap_err().is_corrupt_record());
        assert!(num.set(2, "bad").unwrap_err().is_corrupt_record());
        assert!(num.clear("bad").unwrap_err().is_corrupt_record());
        assert!(num.set_with_string("5", "bad").unwrap_err().is_corrupt_record());
    }

    #[test]
    fn test_describe_uses_default_type() {
        let (storage, store) = setup();
        storage
            .set_item("__PERSISTANCE__", r#"{"v":[1,2]}"#)
            .unwrap();
        let v = Variable::new("v", json!(5), store);

        assert_eq!(v.describe(Domain::NONE).unwrap(), "v: number = [1,2]");
    }
}
