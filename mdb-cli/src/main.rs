mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;
use mdb_rs::{McoError, McoDb};

fn main() -> ExitCode {
    env_logger::init();
    let args = cli::Cli::parse();

    let db = match McoDb::open(&args.path) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("mdb-cli: {err}");
            return match err {
                McoError::Io(_) | McoError::FileTooSmall { .. } => ExitCode::from(1),
            };
        }
    };

    let rendered = if args.json {
        serde_json::to_string_pretty(&output::json(&db)).expect("json values never fail to serialize")
    } else if args.dict {
        output::dict(&db)
    } else if args.analyze {
        output::analyze(&db)
    } else if args.strings {
        output::strings(&db)
    } else if args.fields {
        output::fields()
    } else if args.pages {
        output::pages(&db)
    } else if let Some(offsets) = &args.hex {
        let (offset, length) = (offsets[0] as usize, offsets[1] as usize);
        output::hex(&db, offset, length)
    } else {
        output::summary(&db)
    };

    print!("{rendered}");
    ExitCode::SUCCESS
}
