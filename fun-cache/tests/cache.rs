//! Integration tests for the memoization cache

use fun_cache::{
    cached, cached_contextless, op, CacheError, Cacheable, CallArgs, JsonFileStore, MemoCache,
    MemoryStore, Operation,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Cache-owning test fixture with an instrumented call counter.
struct Analyzer {
    memo: Option<MemoCache>,
    computations: u64,
}

impl Analyzer {
    fn open(name: &str, store: JsonFileStore) -> Self {
        Analyzer {
            memo: Some(MemoCache::open(name, Box::new(store)).expect("open cache")),
            computations: 0,
        }
    }

    fn in_memory() -> Self {
        Analyzer {
            memo: Some(MemoCache::open("analyzer", Box::new(MemoryStore::new())).expect("open")),
            computations: 0,
        }
    }
}

impl Cacheable for Analyzer {
    fn memo(&self) -> Option<&MemoCache> {
        self.memo.as_ref()
    }

    fn memo_mut(&mut self) -> Option<&mut MemoCache> {
        self.memo.as_mut()
    }
}

fn scale_op() -> impl Operation<Analyzer> {
    op("scale", |owner: &mut Analyzer, args: &CallArgs| {
        owner.computations += 1;
        let base = args.positional()[0].as_i64().unwrap_or(0);
        let factor = args
            .keyword("factor")
            .and_then(Value::as_i64)
            .unwrap_or(1);
        Ok(json!(base * factor))
    })
}

#[test]
fn repeated_calls_compute_once_per_context() {
    let mut owner = Analyzer::in_memory();
    let operation = cached(scale_op());
    let args = CallArgs::new().arg(21).kwarg("factor", 2);

    assert_eq!(operation.invoke(&mut owner, &args).unwrap(), json!(42));
    assert_eq!(operation.invoke(&mut owner, &args).unwrap(), json!(42));
    assert_eq!(owner.computations, 1);

    owner.memo_mut().unwrap().set_context("reprocessing");
    assert_eq!(operation.invoke(&mut owner, &args).unwrap(), json!(42));
    assert_eq!(owner.computations, 2);

    let stats = owner.memo().unwrap().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

#[test]
fn keyword_order_hits_the_same_slot() {
    let mut owner = Analyzer::in_memory();
    let operation = cached(op("combine", |owner: &mut Analyzer, args: &CallArgs| {
        owner.computations += 1;
        let a = args.keyword("a").and_then(Value::as_i64).unwrap_or(0);
        let b = args.keyword("b").and_then(Value::as_i64).unwrap_or(0);
        Ok(json!(a + b))
    }));

    let forward = CallArgs::new().kwarg("a", 1).kwarg("b", 2);
    let backward = CallArgs::new().kwarg("b", 2).kwarg("a", 1);
    assert_eq!(operation.invoke(&mut owner, &forward).unwrap(), json!(3));
    assert_eq!(operation.invoke(&mut owner, &backward).unwrap(), json!(3));
    assert_eq!(owner.computations, 1);
}

#[test]
fn clear_only_forgets_the_active_context() {
    let mut owner = Analyzer::in_memory();
    let operation = cached(scale_op());
    let args = CallArgs::new().arg(10);

    operation.invoke(&mut owner, &args).unwrap();
    owner.memo_mut().unwrap().set_context("scratch");
    operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(owner.computations, 2);

    owner.memo_mut().unwrap().clear();
    operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(owner.computations, 3, "scratch context was cleared");

    owner.memo_mut().unwrap().set_context(fun_cache::Context::Contextless);
    operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(owner.computations, 3, "contextless slice survived");
}

#[test]
fn persistence_round_trips_across_instances() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileStore::new(dir.path());
    let operation = cached_contextless(scale_op());
    let args = CallArgs::new().arg(7).kwarg("factor", 3);

    let mut first = Analyzer::open("events", store.clone());
    assert_eq!(operation.invoke(&mut first, &args).unwrap(), json!(21));
    assert_eq!(first.computations, 1);
    first.memo_mut().unwrap().save_contextless().unwrap();

    let mut second = Analyzer::open("events", store.clone());
    assert_eq!(operation.invoke(&mut second, &args).unwrap(), json!(21));
    assert_eq!(second.computations, 0, "answered from the persisted slice");

    // A different instance name starts empty.
    let mut other = Analyzer::open("sessions", store);
    assert_eq!(operation.invoke(&mut other, &args).unwrap(), json!(21));
    assert_eq!(other.computations, 1);
}

#[test]
fn persisted_documents_have_the_documented_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileStore::new(dir.path());
    let operation = cached_contextless(scale_op());

    let mut owner = Analyzer::open("shaped", store);
    operation
        .invoke(&mut owner, &CallArgs::new().arg(2).kwarg("factor", 5))
        .unwrap();
    owner.memo_mut().unwrap().save_contextless().unwrap();

    let raw = std::fs::read(dir.path().join("shaped.json")).expect("document exists");
    let document: Value = serde_json::from_slice(&raw).unwrap();
    let entries = document["scale"].as_object().expect("op-keyed object");
    assert_eq!(entries.len(), 1);
    let (key, value) = entries.iter().next().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(key).unwrap(),
        json!([[2], [["factor", 5]]])
    );
    assert_eq!(value, &json!(10));
}

#[test]
fn clear_contextless_erases_store_and_memory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileStore::new(dir.path());
    let operation = cached_contextless(scale_op());
    let args = CallArgs::new().arg(4);

    let mut owner = Analyzer::open("wipe", store.clone());
    operation.invoke(&mut owner, &args).unwrap();
    owner.memo_mut().unwrap().save_contextless().unwrap();
    owner.memo_mut().unwrap().clear_contextless().unwrap();

    operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(owner.computations, 2, "in-memory slice was dropped");

    let mut reopened = Analyzer::open("wipe", store);
    operation.invoke(&mut reopened, &args).unwrap();
    assert_eq!(reopened.computations, 1, "persisted document was erased");
}

#[test]
fn wrapper_order_and_receiver_contracts_hold() {
    let mut owner = Analyzer::in_memory();
    let double_wrapped = cached(cached(scale_op()));
    assert!(matches!(
        double_wrapped.invoke(&mut owner, &CallArgs::new().arg(1)),
        Err(CacheError::DecoratorOrder)
    ));

    let mut bare = Analyzer {
        memo: None,
        computations: 0,
    };
    let operation = cached(scale_op());
    assert!(matches!(
        operation.invoke(&mut bare, &CallArgs::new().arg(1)),
        Err(CacheError::NotCacheable)
    ));
}

#[test]
fn memoized_transforms_compose_with_the_wrap_layer() {
    use fun_core::{wrap, Wrapped};

    let mut owner = Analyzer::in_memory();
    let operation = cached(op(
        "level_frequencies",
        |owner: &mut Analyzer, args: &CallArgs| {
            owner.computations += 1;
            let levels = match wrap(args.positional()[0].clone()) {
                Wrapped::Sequence(levels) => levels,
                other => panic!("expected sequence argument, got {other:?}"),
            };
            Ok(levels.frequency().into_value())
        },
    ));

    let args = CallArgs::new().arg(json!(["warn", "info", "warn"]));
    let first = operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(first, json!({"warn": 2, "info": 1}));

    let second = operation.invoke(&mut owner, &args).unwrap();
    assert_eq!(second, first);
    assert_eq!(owner.computations, 1);
}

proptest! {
    #[test]
    fn call_keys_ignore_keyword_order(
        pairs in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..6)
    ) {
        let mut forward = CallArgs::new();
        for (name, value) in &pairs {
            forward = forward.kwarg(name.clone(), *value);
        }
        let mut backward = CallArgs::new();
        for (name, value) in pairs.iter().rev() {
            backward = backward.kwarg(name.clone(), *value);
        }
        prop_assert_eq!(forward.key(), backward.key());
    }

    #[test]
    fn call_keys_distinguish_positional_values(a in any::<i64>(), b in any::<i64>()) {
        let left = CallArgs::new().arg(a);
        let right = CallArgs::new().arg(b);
        prop_assert_eq!(left.key() == right.key(), a == b);
    }
}
