//! End-to-end tests for the resolution pipeline.
//!
//! Each test runs the full sequence:
//! Describe component → Build graph → Validate → Plan initialization

use std::rc::Rc;

use graft_model::{
    Binding, BindingKey, BindingType, ComponentDescriptor, ContributionKind, DependencyRequest,
    Element, Key, ModuleDescriptor, ProvisionBinding, RequestKind, Scope, Span, TypeRef,
};
use graft_resolve::{
    build_graph, plan_initialization, validate_graph, ErrorKind, InjectBindingRegistry, PlanStep,
    ScopeHierarchyCheck, Severity, ValidatorOptions, DEFAULT_BATCH_SIZE,
};

fn element(name: &str) -> Element {
    Element::new(name, Span::new(0, 0, 0, 1))
}

fn request(ty: &str, site: &str) -> DependencyRequest {
    DependencyRequest::new(
        Key::for_type(TypeRef::named(ty)),
        RequestKind::Instance,
        element(site),
    )
}

fn provider(
    ty: &str,
    site: &str,
    binding_type: BindingType,
    dependencies: Vec<DependencyRequest>,
) -> Binding {
    Binding::Provision(ProvisionBinding::new(
        Key::for_type(TypeRef::named(ty)),
        element(site),
        ContributionKind::ProviderMethod,
        binding_type,
        None,
        dependencies,
    ))
}

fn module(name: &str, bindings: Vec<Binding>) -> ModuleDescriptor {
    ModuleDescriptor::new(TypeRef::named(name), element(name), bindings)
}

fn component(
    name: &str,
    scope: Option<Scope>,
    modules: Vec<ModuleDescriptor>,
    dependencies: Vec<ComponentDescriptor>,
    entry_points: Vec<DependencyRequest>,
) -> ComponentDescriptor {
    ComponentDescriptor::new(
        TypeRef::named(name),
        element(name),
        scope,
        modules,
        dependencies,
        entry_points,
    )
}

/// An entry point requests Foo, but no module provides it and Foo has no
/// injectable constructor: exactly one missing-binding error.
#[test]
fn test_unprovided_entry_point_is_missing() {
    let c = component(
        "C",
        None,
        vec![],
        vec![],
        vec![request("Foo", "foo()")],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&c);

    let graph = build_graph(&c, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.items().len(), 1);
    assert_eq!(report.items()[0].kind, ErrorKind::MissingBinding);
    assert!(report.items()[0].message.contains("Foo cannot be provided"));
}

/// Two modules both declare a unique provider for Bar: one duplicate-bindings
/// error naming both provider methods.
#[test]
fn test_providers_from_two_modules_collide() {
    let c = component(
        "C",
        None,
        vec![
            module("ModuleA", vec![provider("Bar", "ModuleA.bar()", BindingType::Unique, vec![])]),
            module("ModuleB", vec![provider("Bar", "ModuleB.bar()", BindingType::Unique, vec![])]),
        ],
        vec![],
        vec![request("Bar", "bar()")],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&c);

    let graph = build_graph(&c, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();

    assert_eq!(report.items().len(), 1);
    let d = &report.items()[0];
    assert_eq!(d.kind, ErrorKind::DuplicateBindings);
    assert!(d.message.contains("ModuleA.bar()"));
    assert!(d.message.contains("ModuleB.bar()"));
    assert_eq!(d.elements.len(), 2);
}

/// Two set contributions and no unique provider for the same key: the graph
/// is clean, and the planner orders both contributors ahead of the aggregate.
#[test]
fn test_set_multibinding_plans_contributors_before_aggregate() {
    let c = component(
        "C",
        None,
        vec![module(
            "HandlerModule",
            vec![
                provider("Handler", "HandlerModule.first()", BindingType::Set, vec![]),
                provider("Handler", "HandlerModule.second()", BindingType::Set, vec![]),
            ],
        )],
        vec![],
        vec![request("Handler", "handlers()")],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&c);

    let graph = build_graph(&c, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();
    assert!(report.is_clean());

    let plan = plan_initialization(&graph, DEFAULT_BATCH_SIZE).unwrap();
    let steps: Vec<&PlanStep> = plan.steps().collect();
    assert_eq!(steps.len(), 3);
    assert!(matches!(steps[0], PlanStep::Contribution { .. }));
    assert!(matches!(steps[1], PlanStep::Contribution { .. }));
    assert!(matches!(steps[2], PlanStep::Aggregate { contributions: 2, .. }));
}

/// A scope annotation reused one level down a dependency chain: the
/// violation cites the repeated scope and the component chain.
#[test]
fn test_scope_reuse_down_the_chain() {
    let app = component("AppComponent", Some(Scope::root("App")), vec![], vec![], vec![]);
    let y = component("Y", Some(Scope::named("Session")), vec![], vec![app], vec![]);
    let x = component("X", Some(Scope::named("Session")), vec![], vec![y], vec![]);

    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&x);
    let graph = build_graph(&x, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();

    assert_eq!(report.items().len(), 1);
    let d = &report.items()[0];
    assert_eq!(d.kind, ErrorKind::ScopeHierarchyViolation);
    assert!(d.message.contains("@Session"));
    assert!(d.message.contains("X"));
    assert!(d.message.contains("Y"));
}

/// The same descriptor and registry contents resolved twice produce
/// byte-identical reports and plans.
#[test]
fn test_pipeline_is_deterministic() {
    let build = || {
        component(
            "C",
            None,
            vec![module(
                "M",
                vec![
                    provider("Widget", "M.widget()", BindingType::Unique, vec![
                        request("Clock", "widget(clock)"),
                        request("Missing", "widget(missing)"),
                    ]),
                    provider("Clock", "M.clock()", BindingType::Unique, vec![]),
                    provider("Handler", "M.handlerA()", BindingType::Set, vec![]),
                    provider("Handler", "M.handlerB()", BindingType::Set, vec![]),
                ],
            )],
            vec![],
            vec![request("Widget", "widget()"), request("Handler", "handlers()")],
        )
    };
    let run = || {
        let c = build();
        let mut registry = InjectBindingRegistry::new();
        registry.install_component(&c);
        let graph = build_graph(&c, &mut registry);
        let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();
        let messages: Vec<String> = report.items().iter().map(ToString::to_string).collect();
        let plan: Vec<String> = plan_initialization(&graph, 2)
            .unwrap()
            .steps()
            .map(|s| format!("{s:?}"))
            .collect();
        (messages, plan)
    };

    assert_eq!(run(), run());
}

/// A cycle A→B→C→A reachable from entry point A is reported exactly once,
/// with the path rendered in traversal order up to the repeated key.
#[test]
fn test_cycle_reported_once_per_entry_point() {
    let c = component(
        "C",
        None,
        vec![module(
            "M",
            vec![
                provider("A", "M.a()", BindingType::Unique, vec![request("B", "a(b)")]),
                provider("B", "M.b()", BindingType::Unique, vec![request("C", "b(c)")]),
                provider("C", "M.c()", BindingType::Unique, vec![request("A", "c(a)")]),
            ],
        )],
        vec![],
        vec![request("A", "a()")],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&c);

    let graph = build_graph(&c, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();

    let cycles: Vec<_> = report
        .items()
        .iter()
        .filter(|d| d.kind == ErrorKind::DependencyCycle)
        .collect();
    assert_eq!(cycles.len(), 1);
    let positions: Vec<usize> = ["a(b)", "b(c)", "c(a)"]
        .iter()
        .map(|site| cycles[0].message.find(site).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

/// Synthesizing the same injectable type twice yields the same allocation.
#[test]
fn test_registry_synthesis_is_idempotent() {
    use graft_resolve::BindingSource;

    let mut registry = InjectBindingRegistry::new();
    registry.register_injectable(TypeRef::named("Clock"), element("Clock()"), None, vec![]);

    let first = registry.synthesize_injectable(&TypeRef::named("Clock")).unwrap();
    let second = registry.synthesize_injectable(&TypeRef::named("Clock")).unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // Resolution through a graph reuses the synthesized binding too.
    let c = component("C", None, vec![], vec![], vec![request("Clock", "clock()")]);
    let graph = build_graph(&c, &mut registry);
    let resolved = graph
        .get(&BindingKey::contribution(Key::for_type(TypeRef::named("Clock"))))
        .unwrap();
    assert!(Rc::ptr_eq(&resolved.bindings()[0], &first));
}

/// A root-scoped component with a scoped dependency is always an error, even
/// with the chain check disabled.
#[test]
fn test_root_scope_terminality_survives_disabled_chain_check() {
    let session = component("SessionComponent", Some(Scope::named("Session")), vec![], vec![], vec![]);
    let app = component(
        "AppComponent",
        Some(Scope::root("Singleton")),
        vec![],
        vec![session],
        vec![],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&app);
    let graph = build_graph(&app, &mut registry);

    let options = ValidatorOptions {
        scope_hierarchy: ScopeHierarchyCheck::Disabled,
    };
    let report = validate_graph(&graph, &options).unwrap();
    assert_eq!(report.items().len(), 1);
    assert_eq!(report.items()[0].kind, ErrorKind::ScopeHierarchyViolation);
    assert_eq!(report.items()[0].severity, Severity::Error);
}

/// A dependency component's exposed provision satisfies the dependent's
/// request end to end, and the planner schedules it.
#[test]
fn test_dependency_component_provision_flows_through() {
    let parent = component(
        "ParentComponent",
        None,
        vec![module("ParentModule", vec![provider("Clock", "ParentModule.clock()", BindingType::Unique, vec![])])],
        vec![],
        vec![request("Clock", "clock()")],
    );
    let child = component(
        "ChildComponent",
        None,
        vec![module(
            "ChildModule",
            vec![provider("Widget", "ChildModule.widget()", BindingType::Unique, vec![request("Clock", "widget(clock)")])],
        )],
        vec![parent],
        vec![request("Widget", "widget()")],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&child);

    let graph = build_graph(&child, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();
    assert!(report.is_clean());

    let clock = graph
        .get(&BindingKey::contribution(Key::for_type(TypeRef::named("Clock"))))
        .unwrap();
    assert_eq!(clock.owner(), &TypeRef::named("ParentComponent"));

    let plan = plan_initialization(&graph, DEFAULT_BATCH_SIZE).unwrap();
    let keys: Vec<String> = plan.steps().map(|s| s.key().to_string()).collect();
    assert_eq!(keys, vec!["Clock", "Widget"]);
}

/// Members injection of a type whose members pull further bindings into the
/// graph, all the way through planning.
#[test]
fn test_members_injection_end_to_end() {
    let inject = DependencyRequest::new(
        Key::for_type(TypeRef::named("Activity")),
        RequestKind::MembersInjection,
        element("inject(Activity)"),
    );
    let c = component(
        "C",
        None,
        vec![module("M", vec![provider("Clock", "M.clock()", BindingType::Unique, vec![])])],
        vec![],
        vec![inject],
    );
    let mut registry = InjectBindingRegistry::new();
    registry.install_component(&c);
    registry.register_members_injection(
        TypeRef::named("Activity"),
        element("Activity"),
        vec![request("Clock", "Activity.clock")],
    );

    let graph = build_graph(&c, &mut registry);
    let report = validate_graph(&graph, &ValidatorOptions::default()).unwrap();
    assert!(report.is_clean());

    let plan = plan_initialization(&graph, DEFAULT_BATCH_SIZE).unwrap();
    let keys: Vec<String> = plan.steps().map(|s| s.key().to_string()).collect();
    assert_eq!(keys, vec!["Clock", "members of Activity"]);
}
