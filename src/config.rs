use std::path::PathBuf;

use clap::Parser;

use crate::data::{WorldSource, DEFAULT_WORLD_URL};

#[derive(Parser, Debug)]
#[command(
    name = "dino-map",
    about = "Terminal world map of dinosaur fossil discoveries"
)]
pub struct Cli {
    /// CSV table of fossil records
    #[arg(long, default_value = "dinosaurs.csv")]
    pub data: PathBuf,

    /// World geometry (TopoJSON or GeoJSON), as a URL or a local path
    #[arg(long, default_value = DEFAULT_WORLD_URL)]
    pub world: String,

    /// Log file; the terminal is taken by the map
    #[arg(long, default_value = "dino-map.log")]
    pub log_file: PathBuf,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn world_source(&self) -> WorldSource {
        WorldSource::parse(&self.world)
    }
}
