use clap::{
    crate_authors,
    crate_description,
    crate_name,
    crate_version,
    Args,
    Parser,
};

mod server;

#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Run the auction server service.
    Run(RunOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    /// Number of additional completion attempts a watcher makes when the store
    /// rejects the status update. The default of zero preserves the
    /// fire-and-never-retry behavior.
    #[arg(long = "conclusion-retries")]
    #[arg(env = "CONCLUSION_RETRIES")]
    #[arg(default_value = "0")]
    pub conclusion_retries: u32,
}
