use chrono::Utc;
use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use git_branch_props::branch::{parse_dump, PropertySource};
use git_branch_props::config::{app_config_path, create_config, load_settings};
use git_branch_props::context::Context;
use git_branch_props::error::Error;
use git_branch_props::print::colors::to_term_color;
use git_branch_props::print::{list_records, render_listing};
use git_branch_props::repo::Repo;
use git_branch_props::settings::{parse_key_pattern, parse_key_width, Settings};
use regex::Regex;

fn main() {
    env_logger::init();
    std::process::exit(match from_args() {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    });
}

fn from_args() -> Result<(), Error> {
    let app = Command::new("git-branch-props")
        .version(crate_version!())
        .about(
            "List git branches with user-defined properties.\n\
             \n\
             Properties are stored in the repository config as `branch.<name>.<property>`.",
        )
        .arg(
            Arg::new("path")
                .long("path")
                .short('p')
                .help("Open repository from this path or above. Default '.'")
                .num_args(1)
                .global(true),
        )
        .args(list_args())
        .args_conflicts_with_subcommands(true)
        .subcommand(
            Command::new("list")
                .about("Lists branches with their properties (default).")
                .args(list_args()),
        )
        .subcommand(
            Command::new("get")
                .about("Prints a property of a branch.")
                .arg(Arg::new("property").required(true))
                .arg(branch_arg()),
        )
        .subcommand(
            Command::new("set")
                .about("Sets a property of a branch.")
                .arg(Arg::new("property").required(true))
                .arg(Arg::new("value").required(true))
                .arg(branch_arg()),
        )
        .subcommand(
            Command::new("unset")
                .about("Removes a property from a branch.")
                .arg(Arg::new("property").required(true))
                .arg(branch_arg()),
        )
        .subcommand(Command::new("props").about("Lists the names of all properties in use."))
        .subcommand(
            Command::new("config")
                .about("Prints the effective settings.")
                .arg(
                    Arg::new("init")
                        .long("init")
                        .help("Writes the default settings file to the app config directory.")
                        .action(ArgAction::SetTrue),
                ),
        );

    let matches = app.get_matches();
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or(".");
    let repo = Repo::discover(path)?;

    match matches.subcommand() {
        Some(("list", sub)) => list(&repo, sub),
        Some(("get", sub)) => {
            let branch = target_branch(&repo, sub)?;
            let property = required(sub, "property");
            if let Some(value) = repo.property(&branch, property) {
                println!("{}", value);
            }
            Ok(())
        }
        Some(("set", sub)) => {
            let branch = target_branch(&repo, sub)?;
            repo.set_property(&branch, required(sub, "property"), required(sub, "value"))
        }
        Some(("unset", sub)) => {
            let branch = target_branch(&repo, sub)?;
            let property = required(sub, "property");
            if !repo.unset_property(&branch, property)? {
                eprintln!("Property '{}' is not set on branch '{}'", property, branch);
            }
            Ok(())
        }
        Some(("props", _)) => {
            for name in repo.property_names()? {
                println!("{}", name);
            }
            Ok(())
        }
        Some(("config", sub)) => {
            let app_config = app_config_path();
            if sub.get_flag("init") {
                let path = app_config
                    .as_ref()
                    .ok_or_else(|| Error::Config("No application config directory".to_string()))?;
                if create_config(path)? {
                    eprintln!("Default settings written to {}", path.display());
                }
            }
            let def = load_settings(repo.git_dir(), app_config.as_deref())?;
            let str = toml::to_string_pretty(&def).map_err(|err| Error::Config(err.to_string()))?;
            print!("{}", str);
            Ok(())
        }
        _ => list(&repo, &matches),
    }
}

fn list_args() -> Vec<Arg> {
    vec![
        Arg::new("max-days-old")
            .long("max-days-old")
            .help("Only branches with a commit in the last N days.")
            .value_name("N")
            .value_parser(clap::value_parser!(i64)),
        Arg::new("only-name")
            .long("only-name")
            .help("Only branches whose name matches the regular expression.")
            .value_name("REGEX"),
        Arg::new("except-name")
            .long("except-name")
            .help("Hide branches whose name matches the regular expression.")
            .value_name("REGEX"),
        Arg::new("only")
            .long("only")
            .help("Only branches whose property KEY matches REGEX, 'branch' is the name.")
            .value_name("KEY=REGEX")
            .action(ArgAction::Append),
        Arg::new("except")
            .long("except")
            .help("Hide branches whose property KEY matches REGEX, 'branch' is the name.")
            .value_name("KEY=REGEX")
            .action(ArgAction::Append),
        Arg::new("reverse")
            .long("reverse")
            .short('r')
            .help("List the least recently modified branch first.")
            .action(ArgAction::SetTrue),
        Arg::new("width")
            .long("width")
            .help("Width of the column for property KEY, or 'branch'.")
            .value_name("KEY=N")
            .action(ArgAction::Append),
        Arg::new("header-color")
            .long("header-color")
            .help("Header color: black, red, green, yellow, blue, purple, cyan or white.")
            .value_name("COLOR"),
        Arg::new("header-bold")
            .long("header-bold")
            .help("Print headers in bold.")
            .action(ArgAction::SetTrue),
        Arg::new("no-color")
            .long("no-color")
            .help("Print without colors.")
            .action(ArgAction::SetTrue),
        Arg::new("json")
            .long("json")
            .help("Print branches and their properties as JSON.")
            .action(ArgAction::SetTrue),
    ]
}

fn branch_arg() -> Arg {
    Arg::new("branch")
        .long("branch")
        .short('b')
        .help("Branch to use instead of the current branch.")
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn target_branch(repo: &Repo, matches: &ArgMatches) -> Result<String, Error> {
    match matches.get_one::<String>("branch") {
        Some(branch) => Ok(branch.clone()),
        None => repo
            .current_branch()
            .ok_or_else(|| Error::InvalidArgument("Not on a branch, use --branch".to_string())),
    }
}

fn list(repo: &Repo, matches: &ArgMatches) -> Result<(), Error> {
    let now = Utc::now().timestamp();
    let app_config = app_config_path();
    let mut settings = Settings::from_def(load_settings(repo.git_dir(), app_config.as_deref())?)?;
    apply_list_args(&mut settings, matches)?;

    let branches = parse_dump(&repo.branch_dump(now)?)?;
    let ansi = !matches.get_flag("no-color") && !cfg!(windows) && atty::is(atty::Stream::Stdout);
    let ctx = Context::new(repo, repo.property_names()?, repo.current_branch(), now, ansi);

    if matches.get_flag("json") {
        let records = list_records(branches, &ctx, &settings);
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", render_listing(branches, &ctx, &settings));
    }
    Ok(())
}

fn apply_list_args(settings: &mut Settings, matches: &ArgMatches) -> Result<(), Error> {
    let filters = &mut settings.filters;
    if let Some(days) = matches.get_one::<i64>("max-days-old") {
        filters.max_days_old = Some(*days);
    }
    if let Some(pattern) = matches.get_one::<String>("only-name") {
        filters.name_only = Some(compile(pattern)?);
    }
    if let Some(pattern) = matches.get_one::<String>("except-name") {
        filters.name_except = Some(compile(pattern)?);
    }
    for value in matches.get_many::<String>("only").into_iter().flatten() {
        let (key, regex) = parse_key_pattern(value)?;
        filters.property_only.insert(&key, regex);
    }
    for value in matches.get_many::<String>("except").into_iter().flatten() {
        let (key, regex) = parse_key_pattern(value)?;
        filters.property_except.insert(&key, regex);
    }
    filters.reverse = matches.get_flag("reverse");

    for value in matches.get_many::<String>("width").into_iter().flatten() {
        let (key, width) = parse_key_width(value)?;
        settings.widths.overrides.insert(key, width);
    }
    if let Some(color) = matches.get_one::<String>("header-color") {
        settings.header_style.color = Some(to_term_color(color).map_err(Error::Config)?);
    }
    if matches.get_flag("header-bold") {
        settings.header_style.bold = true;
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|err| Error::Config(err.to_string()))
}
