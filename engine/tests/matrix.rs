//! End-to-end tests for the capability matrix.
//!
//! These exercise the full pipeline: scenario set and operations → registry →
//! compiled products → query evaluation with the executable gate.

use capmatrix_engine::{
    BitVector, CapabilityMatrix, CheckMode, Declarations, Decision, Gate, MatrixMode,
    ProductDecl, ScenarioSet, TaskContext,
};
use capmatrix_types::Position;
use pretty_assertions::assert_eq;

fn editorial_matrix() -> CapabilityMatrix {
    CapabilityMatrix::new(
        ScenarioSet::new(["none", "draft", "published"]),
        &Declarations::new(
            ["view", "edit"],
            vec![
                ProductDecl::new(["view"], "none"),
                ProductDecl::new(["view", "edit"], "draft"),
            ],
        ),
    )
}

fn task(scenario: &str) -> TaskContext {
    TaskContext::new(scenario, true)
}

#[test]
fn end_to_end_editorial_matrix() {
    let matrix = editorial_matrix();
    let draft = task("draft");
    let published = task("published");

    assert!(matrix.scope(None).check_tag("view"));
    assert!(!matrix.scope(None).check_tag("edit"));
    assert!(matrix.scope(Some(&draft)).check_tag("edit"));
    assert!(!matrix.scope(Some(&published)).check_tag("edit"));
}

#[test]
fn explicit_none_context_matches_no_context() {
    let matrix = editorial_matrix();
    let none = task("none");
    assert_eq!(
        matrix.scope(Some(&none)).evaluate("view"),
        matrix.scope(None).evaluate("view")
    );
}

#[test]
fn review_scenario_containment() {
    let matrix = CapabilityMatrix::new(
        ScenarioSet::new(["review", "publish"]),
        &Declarations::new(["edit"], vec![ProductDecl::new(["edit"], "review")]),
    );
    assert!(matrix.scope(Some(&task("review"))).check_tag("edit"));
    assert!(!matrix.scope(Some(&task("publish"))).check_tag("edit"));
}

#[test]
fn and_or_folding() {
    let matrix = editorial_matrix();
    let scope = matrix.scope(None);

    assert!(!scope.check_tags(["view", "edit"], CheckMode::All));
    assert!(scope.check_tags(["view", "edit"], CheckMode::Any));
    assert!(!scope.check_tags(["edit", "delete"], CheckMode::Any));

    let empty: [&str; 0] = [];
    assert!(scope.check_tags(empty, CheckMode::All));
    assert!(scope.check_tags(empty, CheckMode::Any));
}

#[test]
fn executable_gate() {
    let matrix = editorial_matrix();
    let blocked = TaskContext::new("draft", false);
    let scope = matrix.scope(Some(&blocked));

    assert!(!scope.check_tag("edit"));
    assert!(scope.check_tag_with("edit", Gate::Skip));
    assert_eq!(scope.evaluate("edit"), Decision::NotExecutable { product: 1 });
}

#[test]
fn unknown_path_is_denied() {
    let matrix = editorial_matrix();
    assert_eq!(
        matrix.scope(Some(&task("draft"))).evaluate("delete"),
        Decision::UnknownOperation
    );
}

#[test]
fn wide_tag_space_crosses_limbs() {
    // 3 scenarios + 70 operations spans three limbs.
    let operations: Vec<String> = (0..70).map(|i| format!("op{i}")).collect();
    let matrix = CapabilityMatrix::new(
        ScenarioSet::new(["draft", "published"]),
        &Declarations::new(
            operations.clone(),
            vec![
                ProductDecl::new(["op0", "op29", "op69"], "published"),
                ProductDecl::new(operations.clone(), "draft"),
            ],
        ),
    );

    let published = task("published");
    let draft = task("draft");
    let published_scope = matrix.scope(Some(&published));
    assert!(published_scope.check_tag("op69"));
    assert!(published_scope.check_tag("op29"));
    assert!(!published_scope.check_tag("op30"));
    assert!(
        matrix
            .scope(Some(&draft))
            .check_tags(&operations, CheckMode::All)
    );
    assert!(!matrix.scope(None).check_tags(&operations, CheckMode::Any));

    let last = matrix.registry().position_of("op69").unwrap();
    assert_eq!(last.get(), 73);
    assert_eq!(matrix.products()[0].vector().len(), 3);
}

#[test]
fn carry_across_limb_boundary() {
    let one = BitVector::encode_bit(Position::new(1).unwrap());
    let thirty_one = BitVector::encode_bit(Position::new(31).unwrap());
    let sum = BitVector::add([&one, &thirty_one]);
    assert_eq!(sum.and(&thirty_one), thirty_one);
}

#[test]
fn allow_all_mode_permits_everything() {
    let matrix = editorial_matrix().with_mode(MatrixMode::AllowAll);
    let blocked = TaskContext::new("published", false);
    let scope = matrix.scope(Some(&blocked));
    assert!(scope.check_tag("edit"));
    assert!(scope.check_tag("not-declared"));
    assert!(scope.check_tags(["view", "edit"], CheckMode::All));
}

#[test]
fn refresh_swaps_answers_without_new_matrix() {
    let mut matrix = editorial_matrix();
    let published = task("published");
    assert!(!matrix.scope(Some(&published)).check_tag("view"));

    let mut declarations = Declarations::new(
        ["view", "edit"],
        vec![
            ProductDecl::new(["view"], "none"),
            ProductDecl::new(["view", "edit"], "draft"),
        ],
    );
    declarations
        .products
        .push(ProductDecl::new(["view"], "published"));
    matrix.refresh(&declarations);

    assert!(matrix.scope(Some(&published)).check_tag("view"));
    assert!(!matrix.scope(Some(&published)).check_tag("edit"));
}
