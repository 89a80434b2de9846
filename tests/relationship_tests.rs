use ad2rbac::validator::relationships::validate_relationships;
use ad2rbac::validator::ValidationKind;

mod support;
use support::table;

fn users(ids: &[&str]) -> ad2rbac::tables::model::Table {
    let rows: Vec<Vec<&str>> = ids.iter().map(|id| vec![*id]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    table("Users", &["user_id"], &rows)
}

fn groups(ids: &[&str]) -> ad2rbac::tables::model::Table {
    let rows: Vec<Vec<&str>> = ids.iter().map(|id| vec![*id]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    table("Groups", &["group_id"], &rows)
}

#[test]
fn consistent_references_produce_no_errors() {
    let memberships = table("User_Groups", &["user_id", "group_id"], &[&["U1", "G1"]]);
    let hierarchy = table(
        "Group_Groups",
        &["parent_group_id", "child_group_id"],
        &[&["G1", "G2"]],
    );

    let errors = validate_relationships(&users(&["U1"]), &groups(&["G1", "G2"]), &memberships, &hierarchy);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn dangling_user_ids_are_reported_in_one_error_listing_all_values() {
    let memberships = table(
        "User_Groups",
        &["user_id", "group_id"],
        &[&["U9", "G1"], &["U8", "G1"], &["U9", "G1"]],
    );
    let hierarchy = table("Group_Groups", &["parent_group_id", "child_group_id"], &[]);

    let errors = validate_relationships(&users(&["U1"]), &groups(&["G1"]), &memberships, &hierarchy);

    assert_eq!(errors.len(), 1, "one error per violated column: {errors:?}");
    assert_eq!(
        errors[0].message,
        "Invalid user_id values in User_Groups: U8, U9"
    );
    assert_eq!(errors[0].kind, ValidationKind::Relational);
}

#[test]
fn each_violated_column_gets_its_own_error() {
    let memberships = table("User_Groups", &["user_id", "group_id"], &[&["U9", "G9"]]);
    let hierarchy = table(
        "Group_Groups",
        &["parent_group_id", "child_group_id"],
        &[&["G8", "G7"]],
    );

    let errors = validate_relationships(&users(&["U1"]), &groups(&["G1"]), &memberships, &hierarchy);
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();

    assert_eq!(errors.len(), 4, "got: {messages:?}");
    assert!(messages.contains(&"Invalid user_id values in User_Groups: U9"));
    assert!(messages.contains(&"Invalid group_id values in User_Groups: G9"));
    assert!(messages.contains(&"Invalid parent_group_id values in Group_Groups: G8"));
    assert!(messages.contains(&"Invalid child_group_id values in Group_Groups: G7"));
}

#[test]
fn hierarchy_cycle_is_reported_exactly_once() {
    // Two distinct cycles; only the first found is reported.
    let hierarchy = table(
        "Group_Groups",
        &["parent_group_id", "child_group_id"],
        &[&["G1", "G2"], &["G2", "G1"], &["G3", "G4"], &["G4", "G3"]],
    );
    let memberships = table("User_Groups", &["user_id", "group_id"], &[]);

    let errors = validate_relationships(
        &users(&["U1"]),
        &groups(&["G1", "G2", "G3", "G4"]),
        &memberships,
        &hierarchy,
    );

    let cycle_errors: Vec<_> = errors
        .iter()
        .filter(|e| e.message.contains("Circular reference"))
        .collect();
    assert_eq!(cycle_errors.len(), 1, "got: {errors:?}");
    assert!(
        cycle_errors[0]
            .message
            .starts_with("Circular reference detected in group hierarchy: "),
        "got: {}",
        cycle_errors[0].message
    );
}

#[test]
fn diamond_hierarchy_is_not_reported_as_a_cycle() {
    let hierarchy = table(
        "Group_Groups",
        &["parent_group_id", "child_group_id"],
        &[&["P", "A"], &["P", "B"], &["A", "C"], &["B", "C"]],
    );
    let memberships = table("User_Groups", &["user_id", "group_id"], &[]);

    let errors = validate_relationships(
        &users(&["U1"]),
        &groups(&["P", "A", "B", "C"]),
        &memberships,
        &hierarchy,
    );
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn longer_cycles_are_detected() {
    let hierarchy = table(
        "Group_Groups",
        &["parent_group_id", "child_group_id"],
        &[&["G1", "G2"], &["G2", "G3"], &["G3", "G1"]],
    );
    let memberships = table("User_Groups", &["user_id", "group_id"], &[]);

    let errors = validate_relationships(
        &users(&["U1"]),
        &groups(&["G1", "G2", "G3"]),
        &memberships,
        &hierarchy,
    );

    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Circular reference"));
}
