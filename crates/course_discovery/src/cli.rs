use std::path::PathBuf;

use clap::Parser;
use course_discovery::discovery::{DiscoveryConfig, DiscoveryError, QueryParams};

#[derive(Parser, Debug)]
#[command(
    name = "course_discovery",
    version,
    about = "Load the course catalog and print one page of a filtered search"
)]
pub struct Cli {
    /// Query string of a discovery page, e.g. "title=react&minPrice=10&sort=rating-desc&page=2"
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// JSON config file; without it the COURSE_* environment variables are read
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn load_config(&self) -> Result<DiscoveryConfig, DiscoveryError> {
        match &self.config {
            Some(path) => DiscoveryConfig::load_from_file(path),
            None => DiscoveryConfig::from_env(),
        }
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams::parse(&self.query)
    }
}
