// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! Operations CLI: initialize and seed the database, administer the tag
//! vocabulary, run the expiry sweep, and validate suburb boundary files.

use clap::{Parser, Subcommand};
use gigboard_geo::FeatureCollection;
use gigboard_model::{TagId, ZipCode};
use gigboard_store::{
    add_tag, create_schema, deactivate_expired, list_tags, open_file, remove_tag,
    seed_reference_data, SCHEMA_VERSION,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "gigboard")]
#[command(about = "Gigboard operations CLI")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and load reference data (zipcodes, tags).
    Init {
        #[arg(long)]
        db: PathBuf,
    },
    /// Reload reference data into an existing database if missing.
    Seed {
        #[arg(long)]
        db: PathBuf,
    },
    /// Tag vocabulary administration.
    Tags {
        #[command(subcommand)]
        command: TagsCommand,
    },
    /// Deactivate gigs whose dates are past the 2-day grace period.
    SweepExpired {
        #[arg(long)]
        db: PathBuf,
    },
    /// Parse a suburb boundary file and report its feature count.
    CheckSuburbs {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        zip_key: String,
    },
}

#[derive(Subcommand)]
enum TagsCommand {
    List {
        #[arg(long)]
        db: PathBuf,
    },
    Add {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        name: String,
    },
    Remove {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        id: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let json = cli.json;
    match cli.command {
        Commands::Init { db } => {
            let mut conn = open_file(&db).map_err(|e| e.to_string())?;
            create_schema(&conn).map_err(|e| e.to_string())?;
            seed_reference_data(&mut conn).map_err(|e| e.to_string())?;
            emit(
                json,
                json!({"initialized": db.display().to_string(), "schema_version": SCHEMA_VERSION}),
                &format!("initialized {} at schema version {SCHEMA_VERSION}", db.display()),
            );
            Ok(())
        }
        Commands::Seed { db } => {
            let mut conn = open_file(&db).map_err(|e| e.to_string())?;
            seed_reference_data(&mut conn).map_err(|e| e.to_string())?;
            emit(
                json,
                json!({"seeded": db.display().to_string()}),
                &format!("seeded reference data in {}", db.display()),
            );
            Ok(())
        }
        Commands::Tags { command } => run_tags(json, command),
        Commands::SweepExpired { db } => {
            let conn = open_file(&db).map_err(|e| e.to_string())?;
            let swept = deactivate_expired(&conn, unix_now()).map_err(|e| e.to_string())?;
            emit(
                json,
                json!({"deactivated": swept}),
                &format!("deactivated {swept} expired gigs"),
            );
            Ok(())
        }
        Commands::CheckSuburbs { path, zip_key } => {
            let text = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
            let collection = FeatureCollection::parse(&text).map_err(|e| e.to_string())?;
            let zips: Vec<_> = collection
                .features
                .iter()
                .filter_map(|f| f.property_text(&zip_key))
                .collect();
            let well_formed = zips
                .iter()
                .filter(|z| ZipCode::parse(z).is_ok())
                .count();
            emit(
                json,
                json!({
                    "features": collection.features.len(),
                    "with_zip_key": zips.len(),
                    "well_formed_zipcodes": well_formed,
                    "zip_key": zip_key,
                }),
                &format!(
                    "{} features, {} carrying property {zip_key:?}, {well_formed} well-formed zipcodes",
                    collection.features.len(),
                    zips.len()
                ),
            );
            Ok(())
        }
    }
}

fn run_tags(json: bool, command: TagsCommand) -> Result<(), String> {
    match command {
        TagsCommand::List { db } => {
            let conn = open_file(&db).map_err(|e| e.to_string())?;
            let tags = list_tags(&conn).map_err(|e| e.to_string())?;
            if json {
                let rows: Vec<_> = tags
                    .iter()
                    .map(|t| json!({"id": t.id.get(), "tag_name": t.tag_name}))
                    .collect();
                println!("{}", json!({"count": rows.len(), "tags": rows}));
            } else {
                for tag in &tags {
                    println!("{}\t{}", tag.id.get(), tag.tag_name);
                }
            }
            Ok(())
        }
        TagsCommand::Add { db, name } => {
            let conn = open_file(&db).map_err(|e| e.to_string())?;
            let id = add_tag(&conn, &name).map_err(|e| e.to_string())?;
            emit(
                json,
                json!({"added": id.get(), "tag_name": name}),
                &format!("added tag {} ({})", name, id.get()),
            );
            Ok(())
        }
        TagsCommand::Remove { db, id } => {
            let mut conn = open_file(&db).map_err(|e| e.to_string())?;
            remove_tag(&mut conn, TagId::new(id)).map_err(|e| e.to_string())?;
            emit(json, json!({"removed": id}), &format!("removed tag {id}"));
            Ok(())
        }
    }
}

fn emit(json: bool, payload: serde_json::Value, text: &str) {
    if json {
        println!("{payload}");
    } else {
        println!("{text}");
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn init_then_sweep_on_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.db");

        let cli = Cli::parse_from([
            "gigboard",
            "init",
            "--db",
            db.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let cli = Cli::parse_from([
            "gigboard",
            "--json",
            "sweep-expired",
            "--db",
            db.to_str().unwrap(),
        ]);
        run(cli).unwrap();
    }

    #[test]
    fn tag_admin_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.db");
        run(Cli::parse_from(["gigboard", "init", "--db", db.to_str().unwrap()])).unwrap();
        run(Cli::parse_from([
            "gigboard",
            "tags",
            "add",
            "--db",
            db.to_str().unwrap(),
            "--name",
            "Ceramics",
        ]))
        .unwrap();

        let conn = open_file(&db).unwrap();
        let tags = list_tags(&conn).unwrap();
        let added = tags.iter().find(|t| t.tag_name == "Ceramics").unwrap();
        drop(conn);

        run(Cli::parse_from([
            "gigboard",
            "tags",
            "remove",
            "--db",
            db.to_str().unwrap(),
            "--id",
            &added.id.get().to_string(),
        ]))
        .unwrap();

        let conn = open_file(&db).unwrap();
        assert!(list_tags(&conn)
            .unwrap()
            .iter()
            .all(|t| t.tag_name != "Ceramics"));
    }

    #[test]
    fn duplicate_init_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.db");
        for _ in 0..2 {
            run(Cli::parse_from(["gigboard", "init", "--db", db.to_str().unwrap()])).unwrap();
        }
    }
}
