use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::Layer;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Verbosity {
    Debug,
    #[default]
    Info,
}

pub struct Fmt;

impl Fmt {
    pub fn layer<S>(verbosity: Verbosity) -> impl Layer<S>
    where
        S: for<'span> tracing_subscriber::registry::LookupSpan<'span> + tracing::Subscriber,
    {
        let filter = match verbosity {
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        };

        tracing_subscriber::fmt::layer().with_ansi(false).compact().with_filter(filter)
    }
}
