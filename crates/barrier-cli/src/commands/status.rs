use std::path::Path;

use barrier_core::display::log_line;

use super::output::print_snapshot;
use super::{load_config, seeded_controller};

pub fn run(config_path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let controller = seeded_controller(&config);
    print_snapshot(&controller.snapshot(), &config, json)?;
    Ok(())
}

pub fn run_log(config_path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let controller = seeded_controller(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&controller.log().to_vec())?);
    } else {
        for entry in controller.log().entries() {
            println!("{}", log_line(entry));
        }
    }
    Ok(())
}
