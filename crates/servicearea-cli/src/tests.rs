use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["servicearea-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["servicearea-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["servicearea-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_ranges_add_with_decimals() {
    let cli = Cli::try_parse_from([
        "servicearea-cli",
        "ranges",
        "add",
        "--min",
        "0",
        "--max",
        "10.5",
        "--price",
        "25.00",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Ranges {
        command: RangesCommands::Add { min, max, price },
    }) = cli.command
    else {
        panic!("expected ranges add");
    };
    assert_eq!(min, Decimal::ZERO);
    assert_eq!(max, Decimal::new(105, 1));
    assert_eq!(price, Decimal::from(25));
}

#[test]
fn ranges_add_rejects_non_numeric_bounds() {
    let result = Cli::try_parse_from([
        "servicearea-cli",
        "ranges",
        "add",
        "--min",
        "zero",
        "--max",
        "10",
        "--price",
        "5",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_ranges_delete_positional_id() {
    let cli = Cli::try_parse_from(["servicearea-cli", "ranges", "delete", "42"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Ranges {
            command: RangesCommands::Delete { id: 42 }
        })
    ));
}

#[test]
fn parses_price_by_distance() {
    let cli = Cli::try_parse_from(["servicearea-cli", "price", "--distance", "12.5"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Price {
            distance: Some(d),
            origin: None,
            destination: None,
        }) if d == Decimal::new(125, 1)
    ));
}

#[test]
fn parses_price_by_addresses() {
    let cli = Cli::try_parse_from([
        "servicearea-cli",
        "price",
        "--origin",
        "1 Main St",
        "--destination",
        "9 Elm St",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Price {
            distance: None,
            origin: Some(ref o),
            destination: Some(ref d),
        }) if o == "1 Main St" && d == "9 Elm St"
    ));
}

#[test]
fn price_requires_some_input() {
    assert!(Cli::try_parse_from(["servicearea-cli", "price"]).is_err());
}

#[test]
fn price_rejects_distance_mixed_with_addresses() {
    let result = Cli::try_parse_from([
        "servicearea-cli",
        "price",
        "--distance",
        "5",
        "--origin",
        "a",
        "--destination",
        "b",
    ]);
    assert!(result.is_err());
}

#[test]
fn price_origin_requires_destination() {
    let result = Cli::try_parse_from(["servicearea-cli", "price", "--origin", "a"]);
    assert!(result.is_err());
}

#[test]
fn parses_check_command() {
    let cli = Cli::try_parse_from(["servicearea-cli", "check", "--destination", "9 Elm St"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Check { ref destination }) if destination == "9 Elm St"
    ));
}

#[test]
fn parses_settings_set_partial() {
    let cli = Cli::try_parse_from([
        "servicearea-cli",
        "settings",
        "set",
        "--max-service-radius",
        "30",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::Set {
                store_address: None,
                max_service_radius: Some(r),
                ..
            }
        }) if r == Decimal::from(30)
    ));
}

#[test]
fn parses_settings_show() {
    let cli = Cli::try_parse_from(["servicearea-cli", "settings", "show"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Settings {
            command: SettingsCommands::Show
        })
    ));
}
