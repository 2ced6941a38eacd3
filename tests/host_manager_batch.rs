// Host façade batch semantics against a scripted manager.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assetio::core::access::{
    DefaultEntityAccess, EntityTraitsAccess, PublishingAccess, ResolveAccess,
};
use assetio::core::batch::{BatchElementError, BatchElementErrorCode};
use assetio::core::context::{Context, ContextPtr};
use assetio::core::error::{ErrorKind, Result};
use assetio::core::reference::EntityReference;
use assetio::core::session::{HostInterface, HostSession, HostSessionPtr};
use assetio::core::traits_data::{TraitSet, TraitsData};
use assetio::host_api::{Manager, policy};
use assetio::log::{LoggerInterface, Severity};
use assetio::manager_api::{
    ErrorCallback, ExistsSuccessCallback, ManagerInterface, PreflightSuccessCallback,
    RegisterSuccessCallback, ResolveSuccessCallback,
};

type Delivery = (usize, std::result::Result<TraitsData, BatchElementError>);

/// Replays a fixed sequence of callback deliveries for every resolve call.
struct ScriptedManager {
    deliveries: Vec<Delivery>,
    calls: AtomicUsize,
}

impl ScriptedManager {
    fn new(deliveries: Vec<Delivery>) -> Arc<Self> {
        Arc::new(Self {
            deliveries,
            calls: AtomicUsize::new(0),
        })
    }
}

impl ManagerInterface for ScriptedManager {
    fn identifier(&self) -> Result<String> {
        Ok("org.assetio.test.scripted".to_string())
    }

    fn display_name(&self) -> Result<String> {
        Ok("Scripted".to_string())
    }

    fn entity_exists(
        &self,
        entity_references: &[EntityReference],
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: ExistsSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Deliver from worker threads, highest index first.
        std::thread::scope(|scope| {
            for (index, reference) in entity_references.iter().enumerate().rev() {
                scope.spawn(move || on_success(index, reference.as_str().ends_with("yes")));
            }
        });
        Ok(())
    }

    fn resolve(
        &self,
        _entity_references: &[EntityReference],
        _trait_set: &TraitSet,
        _access: ResolveAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: ResolveSuccessCallback<'_>,
        on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (index, outcome) in &self.deliveries {
            match outcome {
                Ok(data) => on_success(*index, data.clone()),
                Err(error) => on_error(*index, error.clone()),
            }
        }
        Ok(())
    }

    fn preflight(
        &self,
        entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: PreflightSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (index, reference) in entity_references.iter().enumerate() {
            on_success(index, EntityReference::new(format!("{reference}#working")));
        }
        Ok(())
    }

    fn register(
        &self,
        _entity_references: &[EntityReference],
        _traits_datas: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: RegisterSuccessCallback<'_>,
        on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        on_error(
            0,
            BatchElementError::new(BatchElementErrorCode::EntityAccessError, "read-only"),
        );
        Ok(())
    }
}

struct TestHost;

impl HostInterface for TestHost {
    fn identifier(&self) -> String {
        "org.assetio.test.host".to_string()
    }

    fn display_name(&self) -> String {
        "Test Host".to_string()
    }
}

struct QuietLogger;

impl LoggerInterface for QuietLogger {
    fn log(&self, _severity: Severity, _message: &str) {}
}

fn facade(manager: Arc<ScriptedManager>) -> Manager {
    let session = HostSession::make(Arc::new(TestHost), Arc::new(QuietLogger));
    Manager::new(manager, session)
}

fn refs(names: &[&str]) -> Vec<EntityReference> {
    names.iter().map(|name| EntityReference::from(*name)).collect()
}

fn located(path: &str) -> TraitsData {
    let mut data = TraitsData::new();
    data.set_trait_property("locatable", "location", path);
    data
}

fn element_error(code: BatchElementErrorCode, message: &str) -> BatchElementError {
    BatchElementError::new(code, message)
}

fn out_of_order_script() -> Vec<Delivery> {
    vec![
        (2, Ok(located("/r3"))),
        (
            0,
            Err(element_error(BatchElementErrorCode::MalformedEntityReference, "bad r1")),
        ),
        (
            1,
            Err(element_error(BatchElementErrorCode::EntityAccessError, "no r2")),
        ),
    ]
}

fn traits() -> TraitSet {
    ["locatable".to_string()].into_iter().collect()
}

#[test]
fn variant_policy_reassembles_out_of_order_results() {
    let manager = facade(ScriptedManager::new(out_of_order_script()));
    let context = Context::new().into_shared();
    let outcomes = manager
        .resolve(
            &refs(&["r1", "r2", "r3"]),
            &traits(),
            ResolveAccess::Read,
            &context,
            policy::Variant,
        )
        .expect("variant never raises element errors");

    assert_eq!(
        outcomes,
        vec![
            Err(element_error(BatchElementErrorCode::MalformedEntityReference, "bad r1")),
            Err(element_error(BatchElementErrorCode::EntityAccessError, "no r2")),
            Ok(located("/r3")),
        ]
    );
}

#[test]
fn default_and_exception_policies_raise_lowest_index_error() {
    let manager = facade(ScriptedManager::new(out_of_order_script()));
    let context = Context::new().into_shared();
    let references = refs(&["r1", "r2", "r3"]);

    let default_err = manager
        .resolve(&references, &traits(), ResolveAccess::Read, &context, policy::Default)
        .expect_err("default raises");
    let exception_err = manager
        .resolve(&references, &traits(), ResolveAccess::Read, &context, policy::Exception)
        .expect_err("exception raises");

    for err in [default_err, exception_err] {
        assert_eq!(err.kind(), ErrorKind::BatchElement);
        assert_eq!(err.index(), Some(0));
        assert_eq!(
            err.batch_element(),
            Some(&element_error(BatchElementErrorCode::MalformedEntityReference, "bad r1"))
        );
        assert_eq!(
            err.to_string(),
            "malformedEntityReference: bad r1 [index=0] [access=read] [entity=r1]"
        );
    }
}

#[test]
fn all_success_returns_plain_values_in_order() {
    let script = vec![(1, Ok(located("/b"))), (0, Ok(located("/a")))];
    let manager = facade(ScriptedManager::new(script));
    let context = Context::new().into_shared();
    let datas = manager
        .resolve(&refs(&["a", "b"]), &traits(), ResolveAccess::Read, &context, policy::Default)
        .expect("no element errors");
    assert_eq!(datas, vec![located("/a"), located("/b")]);
}

#[test]
fn empty_resolve_skips_the_manager_under_every_policy() {
    let scripted = ScriptedManager::new(out_of_order_script());
    let manager = facade(scripted.clone());
    let context = Context::new().into_shared();

    let variant = manager
        .resolve(&[], &traits(), ResolveAccess::Read, &context, policy::Variant)
        .expect("empty");
    assert!(variant.is_empty());
    let default = manager
        .resolve(&[], &traits(), ResolveAccess::Read, &context, policy::Default)
        .expect("empty");
    assert!(default.is_empty());
    let exception = manager
        .resolve(&[], &traits(), ResolveAccess::Read, &context, policy::Exception)
        .expect("empty");
    assert!(exception.is_empty());

    assert_eq!(scripted.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_batches_skip_the_manager_for_every_operation() {
    let scripted = ScriptedManager::new(Vec::new());
    let manager = facade(scripted.clone());
    let context = Context::new().into_shared();

    let exists = manager
        .entity_exists(&[], &context, policy::Default)
        .expect("empty exists");
    assert!(exists.is_empty());
    let working = manager
        .preflight(&[], &[], PublishingAccess::Write, &context, policy::Exception)
        .expect("empty preflight");
    assert!(working.is_empty());
    let registered = manager
        .register(&[], &[], PublishingAccess::Write, &context, policy::Variant)
        .expect("empty register");
    assert!(registered.is_empty());
    let entity_traits = manager
        .entity_traits(&[], EntityTraitsAccess::Read, &context, policy::Default)
        .expect("empty entity traits");
    assert!(entity_traits.is_empty());

    // register and preflight would otherwise report index 0 or echo a reference.
    assert_eq!(scripted.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn singular_resolve_unwraps_the_only_outcome() {
    let manager = facade(ScriptedManager::new(vec![(0, Ok(located("/one")))]));
    let context = Context::new().into_shared();
    let reference = EntityReference::new("one");
    let data = manager
        .resolve_one(&reference, &traits(), ResolveAccess::Read, &context, policy::Default)
        .expect("single");
    assert_eq!(data, located("/one"));

    let manager = facade(ScriptedManager::new(vec![(
        0,
        Err(element_error(BatchElementErrorCode::EntityResolutionError, "gone")),
    )]));
    let outcome = manager
        .resolve_one(&reference, &traits(), ResolveAccess::Read, &context, policy::Variant)
        .expect("variant");
    assert_eq!(
        outcome,
        Err(element_error(BatchElementErrorCode::EntityResolutionError, "gone"))
    );
}

#[test]
fn undelivered_index_is_unhandled_under_every_policy() {
    let script = vec![(0, Ok(located("/a")))];
    let manager = facade(ScriptedManager::new(script));
    let context = Context::new().into_shared();
    let references = refs(&["a", "b"]);

    let variant = manager
        .resolve(&references, &traits(), ResolveAccess::Read, &context, policy::Variant)
        .expect_err("missing slot");
    assert_eq!(variant.kind(), ErrorKind::Unhandled);
    let default = manager
        .resolve(&references, &traits(), ResolveAccess::Read, &context, policy::Default)
        .expect_err("missing slot");
    assert_eq!(default.kind(), ErrorKind::Unhandled);
}

#[test]
fn out_of_range_index_is_rejected() {
    let script = vec![(0, Ok(located("/a"))), (5, Ok(located("/x")))];
    let manager = facade(ScriptedManager::new(script));
    let context = Context::new().into_shared();
    let err = manager
        .resolve(&refs(&["a"]), &traits(), ResolveAccess::Read, &context, policy::Variant)
        .expect_err("index 5 outside batch of 1");
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert_eq!(err.message(), Some("Index '5' out of bounds for batch size of 1"));
}

#[test]
fn callbacks_from_worker_threads_are_reassembled() {
    let manager = facade(ScriptedManager::new(Vec::new()));
    let context = Context::new().into_shared();
    let exists = manager
        .entity_exists(&refs(&["a-yes", "b-no", "c-yes", "d-no"]), &context, policy::Default)
        .expect("exists");
    assert_eq!(exists, vec![true, false, true, false]);
}

#[test]
fn preflight_requires_matching_hint_count() {
    let scripted = ScriptedManager::new(Vec::new());
    let manager = facade(scripted.clone());
    let context = Context::new().into_shared();
    let err = manager
        .preflight(
            &refs(&["a", "b"]),
            &[TraitsData::new()],
            PublishingAccess::Write,
            &context,
            policy::Default,
        )
        .expect_err("length mismatch");
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert_eq!(scripted.calls.load(Ordering::SeqCst), 0);

    let working = manager
        .preflight_one(
            &EntityReference::new("a"),
            &TraitsData::new(),
            PublishingAccess::Write,
            &context,
            policy::Exception,
        )
        .expect("preflight");
    assert_eq!(working, EntityReference::new("a#working"));
}

#[test]
fn register_error_carries_publishing_access() {
    let manager = facade(ScriptedManager::new(Vec::new()));
    let context = Context::new().into_shared();
    let err = manager
        .register_one(
            &EntityReference::new("a"),
            &TraitsData::new(),
            PublishingAccess::CreateRelated,
            &context,
            policy::Default,
        )
        .expect_err("manager refuses");
    assert_eq!(
        err.to_string(),
        "entityAccessError: read-only [index=0] [access=createRelated] [entity=a]"
    );
}

#[test]
fn unsupported_operation_propagates_not_implemented() {
    struct Minimal;
    impl ManagerInterface for Minimal {
        fn identifier(&self) -> Result<String> {
            Ok("minimal".to_string())
        }
        fn display_name(&self) -> Result<String> {
            Ok("Minimal".to_string())
        }
    }

    let session = HostSession::make(Arc::new(TestHost), Arc::new(QuietLogger));
    let manager = Manager::new(Arc::new(Minimal), session);
    let context = Context::new().into_shared();
    let err = manager
        .resolve(&refs(&["a"]), &traits(), ResolveAccess::Read, &context, policy::Variant)
        .expect_err("not implemented");
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
}

#[test]
fn simple_manager_publishes_then_resolves() {
    use assetio::core::value::{InfoDictionary, Value};
    use assetio::simple_manager::{self, SimpleManager};

    let session = HostSession::make(Arc::new(TestHost), Arc::new(QuietLogger));
    let manager = Manager::new(Arc::new(SimpleManager::new()), session);
    let mut settings = InfoDictionary::new();
    settings.insert(
        simple_manager::SETTING_CAPABILITIES.to_string(),
        Value::from("resolution,publishing,existenceQueries"),
    );
    settings.insert(
        simple_manager::SETTING_READ_TRAITS.to_string(),
        Value::from("simple://cat,locatable,location,/assets/cat.png"),
    );
    manager.initialize(settings).expect("initialize");

    let context = Context::new().into_shared();
    let mut published = TraitsData::new();
    published.set_trait_property("locatable", "location", "/assets/dog.png");
    let reference = manager
        .register_one(
            &EntityReference::new("simple://dog"),
            &published,
            PublishingAccess::Write,
            &context,
            policy::Default,
        )
        .expect("register");
    assert_eq!(reference.as_str(), "simple://dog");

    let exists = manager
        .entity_exists(
            &refs(&["simple://cat", "simple://dog", "simple://cow"]),
            &context,
            policy::Default,
        )
        .expect("exists");
    assert_eq!(exists, vec![true, true, false]);

    let outcomes = manager
        .resolve(
            &refs(&["simple://cat", "simple://cow", "simple://dog"]),
            &traits(),
            ResolveAccess::Read,
            &context,
            policy::Variant,
        )
        .expect("resolve");
    assert_eq!(outcomes[0], Ok(located("/assets/cat.png")));
    assert_eq!(
        outcomes[1],
        Err(element_error(BatchElementErrorCode::EntityResolutionError, "Entity not found"))
    );
    assert_eq!(outcomes[2], Ok(located("/assets/dog.png")));

    let err = manager
        .resolve_one(
            &EntityReference::new("simple://cat"),
            &traits(),
            ResolveAccess::ManagerDriven,
            &context,
            policy::Exception,
        )
        .expect_err("read-only");
    assert_eq!(
        err.to_string(),
        "entityAccessError: Entity access is read-only [index=0] [access=managerDriven] [entity=simple://cat]"
    );
}

#[test]
fn simple_manager_introspects_traits_and_defaults() {
    use assetio::core::value::{InfoDictionary, Value};
    use assetio::simple_manager::{self, SimpleManager};

    let session = HostSession::make(Arc::new(TestHost), Arc::new(QuietLogger));
    let manager = Manager::new(Arc::new(SimpleManager::new()), session);
    let mut settings = InfoDictionary::new();
    settings.insert(
        simple_manager::SETTING_CAPABILITIES.to_string(),
        Value::from("resolution,entityTraitIntrospection,defaultEntityReferences"),
    );
    settings.insert(
        simple_manager::SETTING_READ_TRAITS.to_string(),
        Value::from("simple://cat,locatable,location,/assets/cat.png\nsimple://cat,frames,count,24"),
    );
    manager.initialize(settings).expect("initialize");
    let context = Context::new().into_shared();
    let references = refs(&["simple://cat", "simple://cow"]);

    let outcomes = manager
        .entity_traits(&references, EntityTraitsAccess::Read, &context, policy::Variant)
        .expect("variant");
    let cat_traits: TraitSet = ["frames", "locatable"].iter().map(|t| t.to_string()).collect();
    assert_eq!(outcomes[0], Ok(cat_traits.clone()));
    assert_eq!(
        outcomes[1],
        Err(element_error(BatchElementErrorCode::EntityResolutionError, "Entity not found"))
    );

    let err = manager
        .entity_traits(&references, EntityTraitsAccess::Read, &context, policy::Default)
        .expect_err("cow is unknown");
    assert_eq!(
        err.to_string(),
        "entityResolutionError: Entity not found [index=1] [access=read] [entity=simple://cow]"
    );
    let single = manager
        .entity_traits_one(
            &EntityReference::new("simple://cat"),
            EntityTraitsAccess::Read,
            &context,
            policy::Exception,
        )
        .expect("cat exists");
    assert_eq!(single, cat_traits);

    let defaults = manager
        .default_entity_reference(
            &[traits(), TraitSet::from(["shader".to_string()])],
            DefaultEntityAccess::Read,
            &context,
            policy::Default,
        )
        .expect("defaults");
    assert_eq!(defaults, vec![Some(EntityReference::new("simple://cat")), None]);

    // Trait sets carry no reference, so the message has no entity part.
    let err = manager
        .default_entity_reference_one(
            &TraitSet::new(),
            DefaultEntityAccess::Read,
            &context,
            policy::Exception,
        )
        .expect_err("empty trait set");
    assert_eq!(err.to_string(), "invalidTraitSet: Trait set is empty [index=0] [access=read]");
    let err = manager
        .default_entity_reference_one(
            &traits(),
            DefaultEntityAccess::CreateRelated,
            &context,
            policy::Default,
        )
        .expect_err("read-only");
    assert_eq!(
        err.batch_element().map(|element| element.code),
        Some(BatchElementErrorCode::EntityAccessError)
    );
}
