/// Transitive closure of group-role assignments over the nesting graph.
pub mod hierarchy;
/// Mapping of eligible groups to role definitions with category precedence.
pub mod role_builder;
/// Derivation of user-role assignments from memberships.
pub mod user_roles;
