use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_seed_list_and_globals() {
    let cli = Cli::try_parse_from([
        "tm",
        "seed",
        "--seeds",
        "user_seeder,orders_seeder.json",
        "-p",
        "/srv/app",
        "--store",
        ":memory:",
    ])
    .unwrap();

    assert_eq!(cli.global.project_dir, "/srv/app");
    assert_eq!(cli.global.store.as_deref(), Some(":memory:"));
    match cli.command {
        Commands::Seed(args) => {
            assert_eq!(
                args.seeds,
                Some(vec![
                    "user_seeder".to_string(),
                    "orders_seeder.json".to_string()
                ])
            );
            assert_eq!(args.output, ReportOutput::Text);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_repeated_seed_flags_append_in_order() {
    let cli = Cli::try_parse_from(["tm", "seed", "--seeds", "b,a.json", "--seeds", "c"]).unwrap();
    match cli.command {
        Commands::Seed(args) => {
            assert_eq!(args.seeds.unwrap(), vec!["b", "a.json", "c"]);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_seed_list_conflicts_with_manifest() {
    let err = Cli::try_parse_from(["tm", "seed", "--seeds", "a", "--manifest", "m.json"]);
    assert!(err.is_err());
}

#[test]
fn test_new_defaults_to_yaml() {
    let cli = Cli::try_parse_from(["tm", "new", "users_collection_migration"]).unwrap();
    match cli.command {
        Commands::New(args) => {
            assert_eq!(args.slug, "users_collection_migration");
            assert_eq!(args.format, NewFormat::Yml);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_status_json_output() {
    let cli = Cli::try_parse_from(["tm", "status", "--output", "json", "-v"]).unwrap();
    assert!(cli.global.verbose);
    assert!(matches!(
        cli.command,
        Commands::Status(StatusArgs {
            output: StatusOutput::Json
        })
    ));
}
