#![deny(warnings)]

use anyhow::{Context, Result};
use std::env;
use teamgroups::args::{Args, load_dotenv};
use teamgroups::get_team_groups;

fn enable_debug_via_args() {
    let has_debug_flag = env::args().any(|s| s.eq("--debug") || s.eq("-d"));

    if env::var("RUST_LOG").is_err() && has_debug_flag {
        // SAFETY: still single threaded, the runtime isn't built yet.
        unsafe { env::set_var("RUST_LOG", "debug") }
    }
}

fn main() -> Result<()> {
    load_dotenv();
    enable_debug_via_args();
    env_logger::init();

    let args = Args::parse()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    match runtime.block_on(get_team_groups(&args))? {
        Some(groups) => println!("{}", args.output.render(&groups)?),
        None => log::warn!("No registered teams available"),
    }

    Ok(())
}
