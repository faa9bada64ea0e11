use super::*;

#[test]
fn lease_returns_surface_on_drop() {
    let mut pool = SurfacePool::default();
    {
        let lease = pool.acquire(SurfaceDesc::new(8, BitDepth::Int8)).unwrap();
        assert_eq!(lease.resolution(), 8);
        assert_eq!(lease.data().sample_len(), 8 * 8 * 4);
    }
    assert_eq!(
        pool.stats(),
        SurfacePoolStats {
            acquired: 1,
            released: 1,
            live: 0,
            allocated: 1,
            retained_surfaces: 1,
            retained_bytes: 256,
        }
    );
}

#[test]
fn released_storage_is_reused() {
    let mut pool = SurfacePool::default();
    let desc = SurfaceDesc::new(4, BitDepth::Float16);
    let first = pool.acquire(desc).unwrap().id();
    let second = pool.acquire(desc).unwrap().id();
    assert_ne!(first, second);

    let stats = pool.stats();
    assert_eq!(stats.acquired, 2);
    assert_eq!(stats.allocated, 1);
    assert_eq!(stats.live, 0);
}

#[test]
fn different_descriptors_do_not_share_storage() {
    let mut pool = SurfacePool::default();
    drop(pool.acquire(SurfaceDesc::new(4, BitDepth::Int8)).unwrap());
    drop(pool.acquire(SurfaceDesc::new(4, BitDepth::Float16)).unwrap());
    assert_eq!(pool.stats().allocated, 2);
    assert_eq!(pool.stats().retained_surfaces, 2);
}

#[test]
fn acquire_rejects_unusable_sizes() {
    let mut pool = SurfacePool::default();
    assert!(matches!(
        pool.acquire(SurfaceDesc::new(0, BitDepth::Int8)),
        Err(BakeError::SurfaceCreateFailed(_))
    ));
    assert!(matches!(
        pool.acquire(SurfaceDesc::new(MAX_RESOLUTION + 1, BitDepth::Int8)),
        Err(BakeError::SurfaceCreateFailed(_))
    ));

    let mut small = SurfacePool::new(SurfacePoolOpts {
        max_surface_bytes: 1024,
        max_retained_bytes: 0,
    });
    assert!(matches!(
        small.acquire(SurfaceDesc::new(32, BitDepth::Int8)),
        Err(BakeError::SurfaceCreateFailed(_))
    ));
    assert_eq!(small.stats().acquired, 0);
    assert_eq!(small.stats().live, 0);
}

#[test]
fn retention_respects_byte_cap() {
    let mut pool = SurfacePool::new(SurfacePoolOpts {
        max_retained_bytes: 0,
        ..SurfacePoolOpts::default()
    });
    drop(pool.acquire(SurfaceDesc::new(4, BitDepth::Int8)).unwrap());
    let stats = pool.stats();
    assert_eq!(stats.released, 1);
    assert_eq!(stats.retained_surfaces, 0);
    assert_eq!(stats.retained_bytes, 0);
}

#[test]
fn lease_is_released_on_early_return() {
    fn fails(pool: &mut SurfacePool) -> BakeResult<()> {
        let mut lease = pool.acquire(SurfaceDesc::new(2, BitDepth::Int8))?;
        lease.clear([1.0, 1.0, 1.0, 1.0]);
        Err(BakeError::render("boom"))
    }

    let mut pool = SurfacePool::default();
    assert!(fails(&mut pool).is_err());
    let stats = pool.stats();
    assert_eq!(stats.acquired, 1);
    assert_eq!(stats.released, 1);
    assert_eq!(stats.live, 0);
}
