//! Command line definition and dispatch

use crate::commands::{App, RenderOptions};
use crate::config::CliConfig;
use crate::logging::LogFormat;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pathway_hierarchy::CountMode;
use pathway_model::GeneratedAt;
use std::io::Write;
use std::path::PathBuf;

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn fix_orphans_flag() -> Arg {
    Arg::new("fix-orphans")
        .long("fix-orphans")
        .action(ArgAction::SetTrue)
        .help("Attach parentless pathways to the fallback root first")
}

/// Build the `pathway-tree` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("pathway-tree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, lint, diff and generate Pathway Hierarchy Tree reports")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log format: text or json"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a report and print a summary")
                .arg(path_arg("file", "Report file"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("lint")
                .about("Check a report; exits 1 on errors")
                .arg(path_arg("file", "Report file"))
                .arg(
                    Arg::new("strict-total")
                        .long("strict-total")
                        .action(ArgAction::SetTrue)
                        .help("Treat a wrong declared total as an error"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("fmt")
                .about("Re-render a report in canonical form")
                .arg(path_arg("file", "Report file"))
                .arg(
                    Arg::new("write")
                        .long("write")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite the file in place"),
                )
                .arg(
                    Arg::new("recount")
                        .long("recount")
                        .action(ArgAction::SetTrue)
                        .help("Replace the declared total with the distinct pathway count"),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("Show changes between two reports")
                .arg(path_arg("old", "Older report"))
                .arg(path_arg("new", "Newer report"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("history")
                .about("Summarise a directory of report generations")
                .arg(path_arg("dir", "Directory of reports"))
                .arg(
                    Arg::new("dedup")
                        .long("dedup")
                        .action(ArgAction::SetTrue)
                        .help("Drop generations whose tree did not change"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("hierarchy")
                .about("Work with hierarchy documents")
                .subcommand_required(true)
                .subcommand(
                    Command::new("validate")
                        .about("Check hierarchy invariants; exits 1 when invalid")
                        .arg(path_arg("doc", "Hierarchy document (JSON or YAML)"))
                        .arg(fix_orphans_flag())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("render")
                        .about("Build a report from a hierarchy document")
                        .arg(path_arg("doc", "Hierarchy document (JSON or YAML)"))
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .short('o')
                                .value_parser(value_parser!(PathBuf))
                                .help("Write the report to this file"),
                        )
                        .arg(
                            Arg::new("prune")
                                .long("prune")
                                .action(ArgAction::SetTrue)
                                .help("Remove pathways without interactions in their subtree"),
                        )
                        .arg(fix_orphans_flag())
                        .arg(
                            Arg::new("generated")
                                .long("generated")
                                .value_parser(value_parser!(GeneratedAt))
                                .help("Header timestamp (default: now)"),
                        )
                        .arg(
                            Arg::new("counts")
                                .long("counts")
                                .value_parser(value_parser!(CountMode))
                                .help("Counts to show: direct, subtree or none"),
                        ),
                ),
        )
}

/// Global options shared by all subcommands
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configuration file
    pub config: Option<PathBuf>,
    /// `-v` count
    pub verbosity: u8,
    /// Log format
    pub log_format: LogFormat,
}

impl GlobalOptions {
    /// Extract from parsed arguments
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            verbosity: matches.get_count("verbose"),
            log_format: matches.get_one::<LogFormat>("log-format").copied().unwrap_or_default(),
        }
    }
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .ok_or_else(|| anyhow::anyhow!("missing argument <{name}>"))
}

/// Run the selected subcommand; returns false when it found problems
///
/// # Errors
/// Returns error if the configuration or any input cannot be used
pub async fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> anyhow::Result<bool> {
    let globals = GlobalOptions::from_matches(matches);
    let app = App::new(CliConfig::load_or_default(globals.config.as_deref())?);

    match matches.subcommand() {
        Some(("parse", args)) => {
            app.parse(path(args, "file")?, args.get_flag("json"), out).await?;
            Ok(true)
        }
        Some(("lint", args)) => {
            app.lint(
                path(args, "file")?,
                args.get_flag("strict-total"),
                args.get_flag("json"),
                out,
            )
            .await
        }
        Some(("fmt", args)) => {
            app.fmt(path(args, "file")?, args.get_flag("write"), args.get_flag("recount"), out)
                .await?;
            Ok(true)
        }
        Some(("diff", args)) => {
            app.diff(path(args, "old")?, path(args, "new")?, args.get_flag("json"), out)
                .await?;
            Ok(true)
        }
        Some(("history", args)) => {
            app.history(path(args, "dir")?, args.get_flag("dedup"), args.get_flag("json"), out)
                .await?;
            Ok(true)
        }
        Some(("hierarchy", sub)) => match sub.subcommand() {
            Some(("validate", args)) => app.hierarchy_validate(
                path(args, "doc")?,
                args.get_flag("fix-orphans"),
                args.get_flag("json"),
                out,
            ),
            Some(("render", args)) => {
                let options = RenderOptions {
                    out: args.get_one::<PathBuf>("out").cloned(),
                    prune: args.get_flag("prune"),
                    fix_orphans: args.get_flag("fix-orphans"),
                    generated: args.get_one::<GeneratedAt>("generated").copied(),
                    count_mode: args.get_one::<CountMode>("counts").copied(),
                };
                app.hierarchy_render(path(args, "doc")?, options, out).await?;
                Ok(true)
            }
            _ => anyhow::bail!("unknown hierarchy subcommand"),
        },
        _ => anyhow::bail!("unknown subcommand"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_options_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["pathway-tree", "lint", "r.md", "-vv", "--log-format", "json"])
            .unwrap();
        let globals = GlobalOptions::from_matches(&matches);
        assert_eq!(globals.verbosity, 2);
        assert_eq!(globals.log_format, LogFormat::Json);
        assert!(globals.config.is_none());
    }

    #[test]
    fn render_arguments_parse_into_types() {
        let matches = build_cli()
            .try_get_matches_from([
                "pathway-tree",
                "hierarchy",
                "render",
                "doc.json",
                "--counts",
                "subtree",
                "--generated",
                "2025-01-12T10:23:45",
            ])
            .unwrap();
        let (_, hierarchy) = matches.subcommand().unwrap();
        let (name, render) = hierarchy.subcommand().unwrap();
        assert_eq!(name, "render");
        assert_eq!(render.get_one::<CountMode>("counts"), Some(&CountMode::Subtree));
        assert!(render.get_one::<GeneratedAt>("generated").is_some());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(build_cli()
            .try_get_matches_from(["pathway-tree", "hierarchy", "render", "d.json", "--counts", "all"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["pathway-tree", "parse", "r.md", "--log-format", "xml"])
            .is_err());
        assert!(build_cli().try_get_matches_from(["pathway-tree", "diff", "a.md"]).is_err());
    }
}
