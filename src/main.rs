use anyhow::{anyhow, Result};
use clap::{App as Cli, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;
use organizer::app::{parse_assignment, Action, App, Command, UserAction};
use organizer::config::Config;
use organizer::logger::{parse_level, CustomLogger};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(base_url) = matches.value_of("base-url") {
        config.base_url = base_url.to_owned();
    }
    if let Some(user) = matches.value_of("user") {
        config.set_user(user)?;
    }

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        parse_level(&config.log_level)?
    };
    CustomLogger::new(level).init()?;

    let command = command(&matches)?;
    let stdout = io::stdout();
    let stdin = io::stdin();
    App::new(config)
        .execute(command, &mut stdout.lock(), &mut stdin.lock())
        .await?;
    Ok(())
}

fn cli() -> Cli<'static, 'static> {
    let set = Arg::with_name("set")
        .long("set")
        .short("s")
        .value_name("FIELD=VALUE")
        .help("Field value for the form")
        .takes_value(true)
        .multiple(true)
        .number_of_values(1);
    let id = Arg::with_name("id")
        .value_name("ID")
        .help("Record id")
        .required(true);

    let domain = |name: &'static str, about: &'static str| {
        SubCommand::with_name(name)
            .about(about)
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .subcommand(SubCommand::with_name("list").about("List records"))
            .subcommand(
                SubCommand::with_name("add")
                    .about("Create a record")
                    .arg(set.clone()),
            )
            .subcommand(
                SubCommand::with_name("edit")
                    .about("Edit a record")
                    .arg(id.clone())
                    .arg(set.clone()),
            )
            .subcommand(
                SubCommand::with_name("delete")
                    .about("Delete a record")
                    .arg(id.clone())
                    .arg(
                        Arg::with_name("yes")
                            .long("yes")
                            .short("y")
                            .help("Skip the confirmation prompt"),
                    ),
            )
    };

    Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("DIR")
                .help("Use a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Override the service base URL")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("user")
                .long("user")
                .short("u")
                .value_name("ID")
                .help("Act on behalf of another user")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Log requests and responses"),
        )
        .subcommand(domain("tasks", "Manage tasks"))
        .subcommand(domain("school", "Manage school activities"))
        .subcommand(domain("health", "Manage health entries"))
        .subcommand(
            SubCommand::with_name("users")
                .about("Manage users")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("list").about("List users"))
                .subcommand(
                    SubCommand::with_name("add")
                        .about("Register a user")
                        .arg(Arg::with_name("name").required(true))
                        .arg(Arg::with_name("email").required(true)),
                ),
        )
}

fn command(matches: &ArgMatches) -> Result<Command> {
    let (name, sub) = matches.subcommand();
    let sub = sub.ok_or_else(|| anyhow!("Missing command"))?;
    let (action, args) = sub.subcommand();
    let args = args.ok_or_else(|| anyhow!("Missing action for '{}'", name))?;

    if name == "users" {
        return match action {
            "list" => Ok(Command::Users(UserAction::List)),
            "add" => Ok(Command::Users(UserAction::Add {
                name: value(args, "name")?,
                email: value(args, "email")?,
            })),
            other => Err(anyhow!("Unknown action '{}'", other)),
        };
    }

    let assignments = args
        .values_of("set")
        .map(|values| values.map(parse_assignment).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();
    let action = match action {
        "list" => Action::List,
        "add" => Action::Add { assignments },
        "edit" => Action::Edit {
            id: record_id(args)?,
            assignments,
        },
        "delete" => Action::Delete {
            id: record_id(args)?,
            confirmed: args.is_present("yes"),
        },
        other => return Err(anyhow!("Unknown action '{}'", other)),
    };
    Ok(Command::Entity {
        domain: name.parse()?,
        action,
    })
}

fn value(args: &ArgMatches, name: &str) -> Result<String> {
    args.value_of(name)
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("Missing argument '{}'", name))
}

fn record_id(args: &ArgMatches) -> Result<i64> {
    let id = value(args, "id")?;
    id.parse()
        .map_err(|_| anyhow!("Record id must be a number, got '{}'", id))
}
