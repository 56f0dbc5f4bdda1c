//! End-to-end robustness verification scenarios
//!
//! Small multi-agent problems exercised through the full pipeline:
//! reduction, exhaustive planning, verdict classification and
//! counterexample decoding.

use soclaw_check::{
    CheckError, ExhaustiveSearchPlanner, PlanGenerationStatus, SocialLawRobustnessChecker,
    SocialLawRobustnessStatus, SocialLawGenerator,
};
use soclaw_compile::VerifierId;
use soclaw_model::{
    Action, Agent, Atom, Feature, Fluent, Literal, MaProblemWithWaitfor, ModelError,
    MultiAgentProblem, Value,
};

fn checker() -> SocialLawRobustnessChecker<ExhaustiveSearchPlanner> {
    SocialLawRobustnessChecker::new(ExhaustiveSearchPlanner::new())
}

/// Two agents competing for a single shared resource. Each agent's `take`
/// consumes `r` and achieves its private goal; whoever comes second finds
/// the resource gone.
fn shared_resource() -> MultiAgentProblem {
    let mut p = MultiAgentProblem::new("shared_resource");
    p.add_env_fluent(Fluent::bool("r")).unwrap();
    p.set_initial_value(Atom::propositional("r"), Value::Bool(true))
        .unwrap();
    for name in ["a1", "a2"] {
        let mut agent = Agent::new(name);
        agent.add_fluent(Fluent::bool("done")).unwrap();
        let mut take = Action::new("take");
        take.add_precondition(Literal::positive(Atom::propositional("r")));
        take.add_effect(Atom::propositional("r"), false);
        take.add_effect(Atom::propositional("done"), true);
        agent.add_action(take).unwrap();
        p.add_agent(agent).unwrap();
        p.add_agent_goal(name, Literal::positive(Atom::propositional("done")))
            .unwrap();
    }
    p
}

/// Two agents with fully private state. No interleaving can interfere.
fn disjoint_agents() -> MaProblemWithWaitfor {
    let mut p = MultiAgentProblem::new("disjoint");
    for name in ["a1", "a2"] {
        let mut agent = Agent::new(name);
        agent.add_fluent(Fluent::bool("done")).unwrap();
        let mut work = Action::new("work");
        work.add_effect(Atom::propositional("done"), true);
        agent.add_action(work).unwrap();
        p.add_agent(agent).unwrap();
        p.add_agent_goal(name, Literal::positive(Atom::propositional("done")))
            .unwrap();
    }
    MaProblemWithWaitfor::new(p)
}

#[tokio::test]
async fn critical_contention_is_a_failure() {
    let input = MaProblemWithWaitfor::new(shared_resource());
    let result = checker().is_robust(&input).await.unwrap();
    assert_eq!(
        result.status,
        SocialLawRobustnessStatus::NonRobustMultiAgentFail
    );
    assert!(result.counter_example.is_some());
    assert!(result.counter_example_orig_actions.is_some());
}

#[tokio::test]
async fn waitfor_turns_contention_into_deadlock() {
    let mut input = MaProblemWithWaitfor::new(shared_resource());
    for name in ["a1", "a2"] {
        input
            .add_waitfor_annotation(name, "take", Literal::positive(Atom::propositional("r")))
            .unwrap();
    }
    let result = checker().is_robust(&input).await.unwrap();
    assert_eq!(
        result.status,
        SocialLawRobustnessStatus::NonRobustMultiAgentDeadlock
    );
    assert!(result.counter_example.is_some());
}

#[tokio::test]
async fn disjoint_agents_are_robust_under_both_reductions() {
    let input = disjoint_agents();
    for verifier in [VerifierId::Simple, VerifierId::Waiting] {
        let result = checker()
            .with_verifier(verifier)
            .is_robust(&input)
            .await
            .unwrap();
        assert_eq!(result.status, SocialLawRobustnessStatus::RobustRational);
        assert!(result.counter_example.is_none());
        assert!(result.counter_example_orig_actions.is_none());
    }
}

#[tokio::test]
async fn unreachable_goal_is_flagged_before_compilation() {
    let mut p = MultiAgentProblem::new("stuck");
    let mut agent = Agent::new("a1");
    agent.add_fluent(Fluent::bool("done")).unwrap();
    agent.add_action(Action::new("idle")).unwrap();
    p.add_agent(agent).unwrap();
    p.add_agent_goal("a1", Literal::positive(Atom::propositional("done")))
        .unwrap();

    let input = MaProblemWithWaitfor::new(p);
    let result = checker().is_robust(&input).await.unwrap();
    assert_eq!(
        result.status,
        SocialLawRobustnessStatus::NonRobustSingleAgent
    );
    assert!(result.counter_example.is_none());
}

#[tokio::test]
async fn decoded_counterexample_names_original_actions() {
    let input = MaProblemWithWaitfor::new(shared_resource());
    let result = checker().is_robust(&input).await.unwrap();
    let decoded = result.counter_example_orig_actions.unwrap();
    assert!(!decoded.is_empty());
    for step in &decoded.actions {
        let agent = step.agent.as_deref().unwrap();
        let agent = input.problem.agent(agent).unwrap();
        assert!(agent.action(&step.action).is_ok());
    }
}

#[tokio::test]
async fn waiting_reduction_detects_critical_failures() {
    let input = MaProblemWithWaitfor::new(shared_resource());
    let result = checker()
        .with_verifier(VerifierId::Waiting)
        .is_robust(&input)
        .await
        .unwrap();
    assert_eq!(
        result.status,
        SocialLawRobustnessStatus::NonRobustMultiAgentFail
    );
    assert!(result.counter_example.is_some());
}

/// Agent `a1` moves only while `busy` is absent and `a2` can raise or
/// clear it. Waiting on the negated literal has no sound encoding, so the
/// annotation itself must be refused instead of producing a spurious
/// deadlock verdict.
fn toggle_problem() -> MultiAgentProblem {
    let mut p = MultiAgentProblem::new("toggle");
    p.add_env_fluent(Fluent::bool("busy")).unwrap();

    let mut a1 = Agent::new("a1");
    a1.add_fluent(Fluent::bool("done")).unwrap();
    let mut go = Action::new("go");
    go.add_precondition(Literal::negative(Atom::propositional("busy")));
    go.add_effect(Atom::propositional("done"), true);
    a1.add_action(go).unwrap();
    p.add_agent(a1).unwrap();
    p.add_agent_goal("a1", Literal::positive(Atom::propositional("done")))
        .unwrap();

    let mut a2 = Agent::new("a2");
    a2.add_fluent(Fluent::bool("done")).unwrap();
    let mut toggle = Action::new("toggle");
    toggle.add_effect(Atom::propositional("busy"), true);
    toggle.add_effect(Atom::propositional("done"), true);
    a2.add_action(toggle).unwrap();
    let mut untoggle = Action::new("untoggle");
    untoggle.add_effect(Atom::propositional("busy"), false);
    a2.add_action(untoggle).unwrap();
    p.add_agent(a2).unwrap();
    p.add_agent_goal("a2", Literal::positive(Atom::propositional("done")))
        .unwrap();
    p
}

#[tokio::test]
async fn waiting_on_a_negated_literal_is_a_definition_error() {
    let mut input = MaProblemWithWaitfor::new(toggle_problem());
    let err = input
        .add_waitfor_annotation("a1", "go", Literal::negative(Atom::propositional("busy")))
        .unwrap_err();
    assert!(matches!(err, ModelError::NegatedWaitfor { .. }));

    // a spec assembled around the validated entry point is still refused
    // by both reductions instead of yielding a spurious deadlock verdict
    for verifier in [VerifierId::Simple, VerifierId::Waiting] {
        let mut smuggled = MaProblemWithWaitfor::new(toggle_problem());
        smuggled
            .waitfor
            .annotate("a1", "go", Literal::negative(Atom::propositional("busy")));
        let err = checker()
            .with_verifier(verifier)
            .is_robust(&smuggled)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Compile(_)));
    }
}

#[test]
fn checker_advertises_its_supported_features() {
    let c = checker();
    let kind = c.supported_kind();
    assert!(kind.has(Feature::ActionBasedMultiAgent));
    assert!(kind.has(Feature::NegativeConditions));

    assert!(c.supports(&shared_resource().kind()));
    assert!(c.supports(&toggle_problem().kind()));

    let mut numeric = shared_resource().kind();
    numeric.set(Feature::NumericFluents);
    assert!(!c.supports(&numeric));
}

#[tokio::test]
async fn merged_planning_solves_robust_instances_deterministically() {
    let input = disjoint_agents();
    let first = checker().solve(&input).await.unwrap();
    assert_eq!(first.status, PlanGenerationStatus::SolvedSatisficing);
    let plan = first.plan.as_ref().unwrap();
    assert_eq!(plan.len(), 2);

    let second = checker().solve(&input).await.unwrap();
    assert_eq!(
        serde_json::to_string(&first.plan).unwrap(),
        serde_json::to_string(&second.plan).unwrap()
    );
}

#[tokio::test]
async fn pddl_dump_writes_every_compiled_problem() {
    let dir = tempfile::tempdir().unwrap();
    let input = disjoint_agents();
    let result = checker()
        .with_pddl_dump(dir.path())
        .is_robust(&input)
        .await
        .unwrap();
    assert_eq!(result.status, SocialLawRobustnessStatus::RobustRational);

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    // two projections plus the reduction, a domain and a problem file each
    assert_eq!(names.len(), 6);
    assert!(names.iter().any(|n| n.contains("sap_a1")));
    assert!(names.iter().any(|n| n.starts_with("srbv_")));
}

#[tokio::test]
async fn synthesis_finds_a_restricting_law() {
    // Each agent can achieve its goal through the shared resource or on
    // its own, so banning shared access for one side restores robustness.
    let mut p = MultiAgentProblem::new("choice");
    p.add_env_fluent(Fluent::bool("r")).unwrap();
    p.set_initial_value(Atom::propositional("r"), Value::Bool(true))
        .unwrap();
    for name in ["a1", "a2"] {
        let mut agent = Agent::new(name);
        agent.add_fluent(Fluent::bool("done")).unwrap();
        let mut shared = Action::new("use_shared");
        shared.add_precondition(Literal::positive(Atom::propositional("r")));
        shared.add_effect(Atom::propositional("r"), false);
        shared.add_effect(Atom::propositional("done"), true);
        agent.add_action(shared).unwrap();
        let mut own = Action::new("use_own");
        own.add_effect(Atom::propositional("done"), true);
        agent.add_action(own).unwrap();
        p.add_agent(agent).unwrap();
        p.add_agent_goal(name, Literal::positive(Atom::propositional("done")))
            .unwrap();
    }
    let input = MaProblemWithWaitfor::new(p);

    let baseline = checker().is_robust(&input).await.unwrap();
    assert_eq!(
        baseline.status,
        SocialLawRobustnessStatus::NonRobustMultiAgentFail
    );

    let generator = SocialLawGenerator::new(checker());
    let law = generator.generate(&input).await.unwrap().unwrap();
    assert!(!law.is_empty());

    let restricted = law.compile(&input).unwrap();
    let verdict = checker().is_robust(&restricted).await.unwrap();
    assert_eq!(verdict.status, SocialLawRobustnessStatus::RobustRational);
}
