use component_registry::{Phase, RegistryConfig, RegistryError, Step};
use component_sample::components::{AppConfig, ProductStore, StockCache, CACHE, CONFIG, SERVICE, STORE};
use component_sample::error::InventoryError;
use component_sample::lifecycle::AppSystem;
use component_sample::model::ProductId;

/// Builds the system with a fixed stock level instead of reading the environment.
fn system_with_stock(raw_stock: &str) -> AppSystem {
    let mut system = AppSystem::new(RegistryConfig::default()).expect("Failed to create system");
    system
        .registry_mut()
        .create_override(CONFIG, AppConfig::from_raw(Some(raw_stock.to_string())));
    system
}

/// Full boot, a few orders, and a clean shutdown with all real components.
#[test]
fn test_full_inventory_lifecycle() {
    let mut system = system_with_stock("5");
    system.start().expect("Failed to start system");

    let registry = system.registry();
    for name in [CONFIG, STORE, CACHE, SERVICE] {
        assert_eq!(registry.phase_of(name), Some(Phase::SetUp), "{name}");
    }

    let service = system.service().unwrap();
    assert!(service.borrow().is_ready());
    assert_eq!(service.borrow().stock(ProductId(1)), Ok(5));

    let remaining = service.borrow_mut().reserve(ProductId(1), 3).unwrap();
    assert_eq!(remaining, 2);
    assert_eq!(service.borrow().stock(ProductId(1)), Ok(2));
    assert_eq!(service.borrow().stock(ProductId(2)), Ok(5));

    let store = system.registry().lookup::<ProductStore>(STORE).unwrap();
    assert_eq!(store.borrow().get(ProductId(1)).unwrap().quantity, 2);

    system.shutdown().expect("Failed to shut down");

    assert!(!service.borrow().is_ready());
    assert!(!store.borrow().is_open());
    assert_eq!(service.borrow().reservations(), 1);
}

#[test]
fn test_reservation_errors() {
    let mut system = system_with_stock("2");
    system.start().unwrap();
    let service = system.service().unwrap();

    assert_eq!(
        service.borrow_mut().reserve(ProductId(1), 3),
        Err(InventoryError::InsufficientStock {
            requested: 3,
            available: 2
        })
    );
    assert_eq!(
        service.borrow_mut().reserve(ProductId(99), 1),
        Err(InventoryError::NotFound(ProductId(99)))
    );
    assert_eq!(
        service.borrow_mut().reserve(ProductId(1), 0),
        Err(InventoryError::InvalidQuantity(0))
    );

    // failed reservations leave stock untouched
    assert_eq!(service.borrow().stock(ProductId(1)), Ok(2));
    assert_eq!(service.borrow().reservations(), 0);

    system.shutdown().unwrap();
}

#[test]
fn test_shutdown_tears_down_every_component() {
    let mut system = system_with_stock("1");
    system.start().unwrap();

    let cache = system.registry().lookup::<StockCache>(CACHE).unwrap();
    assert!(cache.borrow().is_warm());

    let service = system.service().unwrap();
    let snapshot_before = system.registry().snapshot();
    assert!(snapshot_before.values().all(|phase| *phase == Phase::SetUp));

    system.shutdown().unwrap();

    assert!(!cache.borrow().is_warm());
    assert_eq!(
        service.borrow().stock(ProductId(1)),
        Err(InventoryError::NotReady(CACHE))
    );
}

#[test]
fn test_bad_configuration_fails_start_and_shuts_down_partially() {
    let mut system = system_with_stock("lots");

    let err = system.start().unwrap_err();

    // whichever component reached the config first, the chain ends at its setup error
    let mut found = false;
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(inner) = current {
        if let Some(RegistryError::Component { name, step, source }) =
            inner.downcast_ref::<RegistryError>()
        {
            if name == CONFIG {
                assert_eq!(*step, Step::Setup);
                assert!(matches!(
                    source.downcast_ref::<InventoryError>(),
                    Some(InventoryError::Config { .. })
                ));
                found = true;
            }
        }
        current = inner.source();
    }
    assert!(found, "config error not in chain: {err}");

    assert_eq!(system.registry().phase(), Some(Phase::Assembled));
    let service = system.service().unwrap();
    assert!(!service.borrow().is_ready());

    system.shutdown().expect("Shutdown after a failed start should succeed");
}

#[test]
fn test_start_twice_is_rejected() {
    let mut system = system_with_stock("3");
    system.start().unwrap();

    let err = system.start().unwrap_err();
    assert!(err.is_phase_order());

    system.shutdown().unwrap();
}
