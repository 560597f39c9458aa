//! `sakura tools` -- list the built-in tools.

use std::process::ExitCode;
use std::sync::Arc;

use comfy_table::{Table, presets::UTF8_FULL};
use sakura_core::ToolRegistry;
use sakura_platform::NativePlatform;

use super::{GlobalOpts, build_registry, load_config};

pub async fn run(opts: &GlobalOpts) -> anyhow::Result<ExitCode> {
    let platform = Arc::new(NativePlatform::new());
    let config = load_config(&platform, opts).await?.config;
    let registry = build_registry(platform, &config);
    println!("{}", tools_table(&registry));
    Ok(ExitCode::SUCCESS)
}

fn tools_table(registry: &ToolRegistry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["TOOL", "DESCRIPTION"]);
    for (name, description) in registry.describe() {
        table.add_row([name, description]);
    }
    table
}
