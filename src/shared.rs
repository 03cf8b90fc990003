//! Lazily created pools shared within a thread

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

thread_local! {
    static REGISTRY: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Get the current thread's shared instance of `P`, creating it on first use.
///
/// Each pool type gets one instance per thread, dropped when the thread exits.
/// Owning a pool explicitly is usually the better choice.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use scratch_pool::{shared, ListPool};
///
/// let a = shared::<ListPool<u32>>();
/// let b = ListPool::<u32>::shared();
/// assert!(Rc::ptr_eq(&a, &b));
/// ```
pub fn shared<P: Default + 'static>() -> Rc<P> {
    let key = TypeId::of::<P>();

    let existing = REGISTRY.with(|registry| registry.borrow().get(&key).cloned());
    if let Some(pool) = existing.and_then(|any| any.downcast::<P>().ok()) {
        return pool;
    }

    // Built outside the registry borrow; `P::default` may itself ask for a shared pool.
    let pool = Rc::new(P::default());
    debug!(pool = std::any::type_name::<P>(), "created shared pool");
    REGISTRY.with(|registry| {
        registry.borrow_mut().insert(key, Rc::clone(&pool) as Rc<dyn Any>);
    });
    pool
}
