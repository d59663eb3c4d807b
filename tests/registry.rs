use modreg::{
    create, instance, utils::thread_safety::RcThreadSafety, Inject, InjectCloned, InjectInstance, InstantiateErrorKind,
    InstantiatorResult, Instances, ResolveErrorKind,
};
use std::sync::atomic::{AtomicUsize, Ordering};

trait UserRepo: Send + Sync {
    fn name(&self) -> &'static str;
}

struct PostgresUserRepo;

impl UserRepo for PostgresUserRepo {
    fn name(&self) -> &'static str {
        "postgres"
    }
}

struct InMemoryUserRepo;

impl UserRepo for InMemoryUserRepo {
    fn name(&self) -> &'static str {
        "in-memory"
    }
}

struct CreateUser {
    repo: RcThreadSafety<Box<dyn UserRepo>>,
}

fn create_user(Inject(repo): Inject<Box<dyn UserRepo>>) -> InstantiatorResult<CreateUser> {
    Ok(CreateUser { repo })
}

fn app_registry(repo_calls: RcThreadSafety<AtomicUsize>) -> modreg::Registry {
    let registry = create();
    registry.define("dsn", instance("postgres://localhost")).unwrap();
    registry
        .define_with_deps("repo", ["dsn"], move |_: InjectInstance| {
            repo_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, InstantiateErrorKind>(Box::new(PostgresUserRepo) as Box<dyn UserRepo>)
        })
        .unwrap();
    registry
        .define_with_deps("create_user", ["repo"], create_user)
        .unwrap();
    registry
}

#[test]
fn test_lazy_memoized_resolution() {
    let repo_calls = RcThreadSafety::new(AtomicUsize::new(0));
    let registry = app_registry(repo_calls.clone());

    assert!(!registry.is_initialized("repo"));
    assert_eq!(repo_calls.load(Ordering::SeqCst), 0);

    let first = registry.get::<CreateUser>("create_user").unwrap();
    let second = registry.get::<CreateUser>("create_user").unwrap();

    assert!(RcThreadSafety::ptr_eq(&first, &second));
    assert_eq!(first.repo.name(), "postgres");
    assert_eq!(repo_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fake_repo_is_isolated() {
    let repo_calls = RcThreadSafety::new(AtomicUsize::new(0));
    let registry = app_registry(repo_calls.clone());

    let mut fakes = Instances::new();
    fakes.insert("repo", Box::new(InMemoryUserRepo) as Box<dyn UserRepo>);

    let create_user = registry.get_with::<CreateUser>("create_user", &mut fakes).unwrap();

    assert_eq!(create_user.repo.name(), "in-memory");
    assert_eq!(repo_calls.load(Ordering::SeqCst), 0);
    assert!(fakes.contains("create_user"));
    assert!(!fakes.contains("dsn"));
    assert!(!registry.is_initialized("create_user"));
    assert!(!registry.is_initialized("repo"));

    let create_user = registry.get::<CreateUser>("create_user").unwrap();
    assert_eq!(create_user.repo.name(), "postgres");
    assert_eq!(repo_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transitive_dependencies_are_deduplicated() {
    let registry = create();
    registry.define("a", instance(())).unwrap();
    registry.define_with_deps("b", ["a"], instance(())).unwrap();
    registry.define_with_deps("c", ["a", "b"], instance(())).unwrap();
    registry.define_with_deps("d", ["c", "a", "c"], instance(())).unwrap();

    assert_eq!(registry.dependency_ids("c").unwrap(), ["a", "b"]);
    assert_eq!(registry.dependency_ids("d").unwrap(), ["a", "b", "c"]);
    assert!(registry.dependency_ids("a").unwrap().is_empty());
    assert!(!registry.is_initialized("a"));
}

#[test]
fn test_forward_references() {
    let registry = create();
    registry
        .define_with_deps("sum", ["x", "y"], |InjectCloned(x): InjectCloned<i32>, InjectCloned(y): InjectCloned<i32>| {
            Ok::<_, InstantiateErrorKind>(x + y)
        })
        .unwrap();

    assert!(matches!(registry.require("sum"), Err(ResolveErrorKind::UndefinedId { id }) if id == "x"));

    registry.define("x", instance(40)).unwrap();
    registry.define("y", instance(2)).unwrap();

    assert_eq!(*registry.get::<i32>("sum").unwrap(), 42);
}

#[test]
fn test_cycle_through_three_modules() {
    let registry = create();
    registry.define_with_deps("a", ["b"], instance(())).unwrap();
    registry.define_with_deps("b", ["c"], instance(())).unwrap();
    registry.define_with_deps("c", ["a"], instance(())).unwrap();
    registry.define("free", instance(())).unwrap();

    let err = registry.require("a").unwrap_err();
    assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> c -> a");
    assert!(!registry.is_initialized("a"));
    assert!(!registry.is_initialized("b"));
    assert!(!registry.is_initialized("c"));

    assert!(registry.require("free").is_ok());
    assert!(registry.state().is_err());
}

#[test]
fn test_state_and_log() {
    let registry = create();
    registry.define("a", instance(1u8)).unwrap();
    registry.define_with_deps("b", ["a"], instance(2u8)).unwrap();
    registry.define_with_deps("c", ["a", "b"], instance(3u8)).unwrap();

    let state = registry.state().unwrap();
    assert_eq!(state["a"].reqd, ["b", "c"]);
    assert_eq!(state["b"].reqd, ["c"]);
    assert_eq!(state["c"].reqs, ["a", "b"]);

    let _ = registry.require("a").unwrap();
    assert_eq!(registry.log(false).unwrap(), "\n* a -> [  ]\n  b -> [ a ]\n  c -> [ a, b ]\n");
    assert_eq!(registry.log(true).unwrap(), "\n* a -> [ b, c ]\n  b -> [ c ]\n  c -> [  ]\n");
    assert_eq!(state.report(false).to_string(), "\n  a -> [  ]\n  b -> [ a ]\n  c -> [ a, b ]\n");
}
