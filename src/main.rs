//! CLI entry point for `ad2rbac`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ad2rbac::output::formatter;
use ad2rbac::resolver::hierarchy::{self, InheritanceDirection};
use ad2rbac::resolver::role_builder;
use ad2rbac::resolver::user_roles;
use ad2rbac::tables::config::EligibilityConfig;
use ad2rbac::tables::csv_reader;
use ad2rbac::tables::defaults;
use ad2rbac::validator::relationships;
use ad2rbac::validator::{schema, ValidationProfile};

#[derive(Parser)]
#[command(
    name = "ad2rbac",
    about = "Derive an RBAC role model from a directory-style identity export"
)]
struct Cli {
    /// Directory containing the four input tables (Users.csv, Groups.csv, User_Groups.csv, Group_Groups.csv)
    #[arg(long)]
    input: PathBuf,

    /// JSON document mapping category names to eligible group names
    #[arg(long)]
    config: PathBuf,

    /// Output directory for the seven tables and the report
    #[arg(long, default_value = "ad2rbac-output")]
    output: PathBuf,

    /// Timestamp validation profile
    #[arg(long, default_value = "strict")]
    profile: ValidationProfile,

    /// Direction in which roles propagate along hierarchy edges
    #[arg(long, default_value = "parent-to-child")]
    inheritance: InheritanceDirection,

    /// Log level filter (e.g. info, debug, ad2rbac=trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Stage 1: Load the eligibility configuration
    let config = match EligibilityConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(2);
        }
    };

    // Stage 2: Read the input tables
    let mut tables = match csv_reader::read_input_tables(&cli.input) {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error reading input tables: {e}");
            process::exit(2);
        }
    };
    tracing::debug!(
        users = tables.users.len(),
        groups = tables.groups.len(),
        memberships = tables.user_groups.len(),
        hierarchy_edges = tables.group_groups.len(),
        "read input snapshot"
    );

    // Stage 3: Populate derivable fields
    defaults::populate_defaults(&mut tables);

    // Stage 4: Validate schemas and relationships — the gate before resolution
    let mut errors = Vec::new();
    for table in tables.iter() {
        errors.extend(schema::validate(table, cli.profile));
    }
    errors.extend(relationships::validate_relationships(
        &tables.users,
        &tables.groups,
        &tables.user_groups,
        &tables.group_groups,
    ));
    if !errors.is_empty() {
        eprintln!("Validation failed with {} error(s):", errors.len());
        for error in &errors {
            eprintln!("  - {error}");
        }
        process::exit(1);
    }

    // Stage 5: Build direct role assignments
    let (roles, direct) = role_builder::build_role_assignments(&tables.groups, &config);
    tracing::debug!(roles = roles.len(), "built direct role assignments");

    // Stage 6: Close group-role assignments over the hierarchy
    let edges = tables.group_groups.pairs("parent_group_id", "child_group_id");
    let closed = hierarchy::resolve_group_roles(&direct, &edges, cli.inheritance);

    // Stage 7: Join memberships against the closed assignments
    let memberships = tables.user_groups.pairs("user_id", "group_id");
    let user_roles = user_roles::resolve_user_roles(&memberships, &closed);

    // Stage 8: Write the seven output tables and the report
    let output = formatter::output_tables(&tables, &roles, &closed, &user_roles);
    if let Err(e) = formatter::write_output(&cli.output, &output, &roles) {
        eprintln!("Error writing output: {e}");
        process::exit(2);
    }

    println!("Role mapping complete");
    println!("  users: {}", tables.users.len());
    println!("  groups: {}", tables.groups.len());
    println!("  roles: {}", roles.len());
    println!("  group-role assignments: {}", closed.len());
    println!("  user-role assignments: {}", user_roles.len());
    println!("Output written to {}", cli.output.display());
}
