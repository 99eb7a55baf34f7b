use std::env;
use std::io;
use std::path::Path;

use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osm_tag_history::config::{load_user_config, DEFAULT_CONFIG_PATH};
use osm_tag_history::errors::Result;
use osm_tag_history::etl::tag_history::TagHistoryEtl;
use osm_tag_history::etl::Etl;

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let user_config = load_user_config(Path::new(&config_path))?;
    setup_logging(&user_config.log_level);

    let tags = user_config.tags.join(",");
    info!(
        input = user_config.input_path.as_str(),
        output = user_config.output_path.as_str(),
        tags = tags.as_str();
        "Extracting tag history from OSM export"
    );

    let mut etl = TagHistoryEtl::new(&user_config);
    if user_config.overwrite {
        etl.clean()?;
    }
    etl.process()
}
