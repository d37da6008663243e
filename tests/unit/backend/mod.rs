use super::*;
use crate::foundation::error::CanopyError;

#[test]
fn texture_cache_loads_once() {
    let mut cache: TextureCache<String> = TextureCache::new();
    let mut loads = 0;
    for _ in 0..3 {
        let v = cache
            .get_or_load("a.png", |s| {
                loads += 1;
                Ok(s.to_uppercase())
            })
            .unwrap();
        assert_eq!(v, "A.PNG");
    }
    assert_eq!(loads, 1);
    assert_eq!(cache.stats(), (2, 1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn failed_loads_are_not_cached() {
    let mut cache: TextureCache<u32> = TextureCache::new();
    let err = cache
        .get_or_load("broken", |_| Err(CanopyError::validation("decode failed")))
        .unwrap_err();
    assert!(err.to_string().contains("decode failed"));
    assert!(cache.get("broken").is_none());

    cache.get_or_load("ok", |_| Ok(7)).unwrap();
    assert_eq!(cache.evict("ok"), Some(7));
    assert!(cache.is_empty());
}

#[test]
fn handle_downcasts_to_its_state() {
    let mut h = BackendHandle::packed(5_u32);
    assert!(h.packs_children);
    assert_eq!(h.downcast_ref::<u32>(), Some(&5));
    *h.downcast_mut::<u32>().unwrap() = 6;
    assert_eq!(h.downcast_ref::<u32>(), Some(&6));
    assert!(h.downcast_ref::<String>().is_none());
    assert!(!BackendHandle::new(()).packs_children);
}
