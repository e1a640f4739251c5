// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: config file path
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .help("Path to a config file (default: ./nbdc2rs.toml)")
}

/// Common argument: keep downloaded data after the run
fn keep_data_arg() -> Arg {
    Arg::new("keep_data")
        .long("keep-data")
        .action(clap::ArgAction::SetTrue)
        .help("Keep downloaded data and extracted CSVs after conversion")
}

fn build_cli() -> Command {
    Command::new("nbdc2rs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert NBDC data dictionaries to ReproSchema JSON-LD")
        .subcommand_required(false)
        .subcommand(
            Command::new("convert")
                .about("Convert a single release to ReproSchema")
                .arg(
                    Arg::new("release")
                        .short('r')
                        .long("release")
                        .required(true)
                        .help("Release version to convert (e.g. 1.0)"),
                )
                .arg(
                    Arg::new("skip_extract")
                        .long("skip-extract")
                        .action(clap::ArgAction::SetTrue)
                        .help("Skip the R extraction step (use an existing CSV)"),
                )
                .arg(keep_data_arg())
                .arg(
                    Arg::new("no_validate")
                        .long("no-validate")
                        .action(clap::ArgAction::SetTrue)
                        .help("Skip validating the generated output"),
                )
                .arg(Arg::new("yaml").long("yaml").help("Converter YAML config"))
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("sync")
                .about("Convert all releases that have no git tag yet")
                .arg(
                    Arg::new("release")
                        .short('r')
                        .long("release")
                        .help("Restrict the sync to one release"),
                )
                .arg(
                    Arg::new("no_commit")
                        .long("no-commit")
                        .action(clap::ArgAction::SetTrue)
                        .help("Do not commit conversion results"),
                )
                .arg(
                    Arg::new("create_tag")
                        .long("create-tag")
                        .action(clap::ArgAction::SetTrue)
                        .help("Create an annotated git tag per converted release"),
                )
                .arg(
                    Arg::new("push")
                        .long("push")
                        .action(clap::ArgAction::SetTrue)
                        .help("Push commits (and tags) to origin"),
                )
                .arg(keep_data_arg())
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(clap::ArgAction::SetTrue)
                        .help("Show what would be converted without converting"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .value_name("PATH")
                        .help("Write a JSON run report to this path"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("releases")
                .about("List releases in the source data file")
                .arg(
                    Arg::new("pending")
                        .long("pending")
                        .action(clap::ArgAction::SetTrue)
                        .help("Show only releases that are not converted yet"),
                )
                .arg(keep_data_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check that the required external tools are installed")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("nbdc2rs.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
