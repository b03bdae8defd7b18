use anyhow::Context as _;

const DEFAULT_FILTER: &str = "info";
// html5ever reports every recovered markup error at debug level.
const PARSER_NOISE: [&str; 2] = ["html5ever=warn", "selectors=warn"];

pub fn init() -> anyhow::Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;
    for directive in PARSER_NOISE {
        let directive = directive
            .parse::<tracing_subscriber::filter::Directive>()
            .context("parse log directive")?;
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
