//! Operation wrapping for the cache layer
//!
//! Operations are named callables over a receiver. The cache wrapper
//! memoizes an operation's results and must be the outermost wrapper, so
//! entries key by the real operation name.

use serde_json::Value;

use crate::call_key::CallArgs;
use crate::context::Context;
use crate::error::{CacheError, Result};
use crate::memo::MemoCache;

/// Reserved name reported by cache wrappers; wrapping it again is a
/// wrapper-order defect.
const WRAPPER_NAME: &str = "<cached>";

/// Receiver that may own a memoization cache.
pub trait Cacheable {
    /// Borrow the cache when this receiver owns one.
    fn memo(&self) -> Option<&MemoCache>;
    /// Mutably borrow the cache when this receiver owns one.
    fn memo_mut(&mut self) -> Option<&mut MemoCache>;
}

/// A named operation over a receiver of type `O`.
pub trait Operation<O> {
    /// Name the cache keys entries under.
    fn name(&self) -> &str;
    /// Run the operation.
    fn invoke(&self, owner: &mut O, args: &CallArgs) -> Result<Value>;
}

/// Plain named operation backed by a function.
pub struct OpFn<F> {
    name: &'static str,
    f: F,
}

/// Build a plain named operation.
pub fn op<O, F>(name: &'static str, f: F) -> OpFn<F>
where
    F: Fn(&mut O, &CallArgs) -> Result<Value>,
{
    OpFn { name, f }
}

impl<O, F> Operation<O> for OpFn<F>
where
    F: Fn(&mut O, &CallArgs) -> Result<Value>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn invoke(&self, owner: &mut O, args: &CallArgs) -> Result<Value> {
        (self.f)(owner, args)
    }
}

/// Cache wrapper around an operation; built by [`cached`] and
/// [`cached_contextless`].
pub struct Cached<T> {
    inner: T,
    contextless: bool,
}

/// Memoize `inner` under the receiver's active context.
pub fn cached<T>(inner: T) -> Cached<T> {
    Cached {
        inner,
        contextless: false,
    }
}

/// Memoize `inner` under the distinguished no-context tag regardless of the
/// active context. Intended for data that does not vary by context; entries
/// cached this way are the ones eligible for persistence.
pub fn cached_contextless<T>(inner: T) -> Cached<T> {
    Cached {
        inner,
        contextless: true,
    }
}

impl<O, T> Operation<O> for Cached<T>
where
    O: Cacheable,
    T: Operation<O>,
{
    fn name(&self) -> &str {
        WRAPPER_NAME
    }

    fn invoke(&self, owner: &mut O, args: &CallArgs) -> Result<Value> {
        let op_name = self.inner.name().to_string();
        if op_name == WRAPPER_NAME {
            return Err(CacheError::DecoratorOrder);
        }
        let key = args.key();
        let context = {
            let memo = owner.memo_mut().ok_or(CacheError::NotCacheable)?;
            let context = if self.contextless {
                Context::Contextless
            } else {
                memo.context().clone()
            };
            if let Some(hit) = memo.lookup(&context, &op_name, &key) {
                return Ok(hit);
            }
            context
        };
        let computed = self.inner.invoke(owner, args)?;
        let memo = owner.memo_mut().ok_or(CacheError::NotCacheable)?;
        memo.store_value(context, &op_name, key, computed.clone());
        Ok(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    struct Owner {
        memo: Option<MemoCache>,
        calls: u64,
    }

    impl Owner {
        fn cacheable() -> Self {
            Owner {
                memo: Some(MemoCache::open("owner", Box::new(MemoryStore::new())).unwrap()),
                calls: 0,
            }
        }

        fn bare() -> Self {
            Owner {
                memo: None,
                calls: 0,
            }
        }
    }

    impl Cacheable for Owner {
        fn memo(&self) -> Option<&MemoCache> {
            self.memo.as_ref()
        }

        fn memo_mut(&mut self) -> Option<&mut MemoCache> {
            self.memo.as_mut()
        }
    }

    fn counting_op() -> OpFn<impl Fn(&mut Owner, &CallArgs) -> Result<Value>> {
        op("count", |owner: &mut Owner, args: &CallArgs| {
            owner.calls += 1;
            Ok(json!([args.positional(), owner.calls]))
        })
    }

    #[test]
    fn hit_skips_recomputation() {
        let mut owner = Owner::cacheable();
        let operation = cached(counting_op());
        let args = CallArgs::new().arg(1);

        let first = operation.invoke(&mut owner, &args).unwrap();
        let second = operation.invoke(&mut owner, &args).unwrap();
        assert_eq!(first, second);
        assert_eq!(owner.calls, 1);
    }

    #[test]
    fn distinct_context_means_distinct_slot() {
        let mut owner = Owner::cacheable();
        let operation = cached(counting_op());
        let args = CallArgs::new().arg(1);

        operation.invoke(&mut owner, &args).unwrap();
        owner.memo_mut().unwrap().set_context("other");
        operation.invoke(&mut owner, &args).unwrap();
        assert_eq!(owner.calls, 2);
    }

    #[test]
    fn contextless_wrapper_ignores_the_active_context() {
        let mut owner = Owner::cacheable();
        let operation = cached_contextless(counting_op());
        let args = CallArgs::new().arg(1);

        operation.invoke(&mut owner, &args).unwrap();
        owner.memo_mut().unwrap().set_context("other");
        operation.invoke(&mut owner, &args).unwrap();
        assert_eq!(owner.calls, 1);
    }

    #[test]
    fn wrapping_a_wrapper_fails() {
        let mut owner = Owner::cacheable();
        let operation = cached(cached(counting_op()));
        let result = operation.invoke(&mut owner, &CallArgs::new());
        assert!(matches!(result, Err(CacheError::DecoratorOrder)));
        assert_eq!(owner.calls, 0);
    }

    #[test]
    fn bare_receiver_fails() {
        let mut owner = Owner::bare();
        let operation = cached(counting_op());
        let result = operation.invoke(&mut owner, &CallArgs::new());
        assert!(matches!(result, Err(CacheError::NotCacheable)));
    }
}
